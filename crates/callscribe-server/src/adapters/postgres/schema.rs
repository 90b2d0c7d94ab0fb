//! Key column types of the host tables
//!
//! Ids arrive as text. Casting the bound parameter to the column's own type
//! keeps the comparison on the indexed column; the types are read from the
//! catalog once at startup since the schema belongs to the host system.

use std::time::Duration;

use sqlx::PgPool;

use callscribe::DomainError;

use super::call_session::deadline;

const COLUMN_TYPE_SQL: &str = r#"
    SELECT format_type(a.atttypid, a.atttypmod)
    FROM pg_attribute a
    WHERE a.attrelid = $1::regclass AND a.attname = $2 AND NOT a.attisdropped
"#;

/// Statements against `"smartFlo"` with key parameters cast to the column types
#[derive(Debug, Clone)]
pub struct CallLogSchema {
    pub(super) find_call: String,
    pub(super) active_questions: String,
    pub(super) replace_analysis: String,
}

impl CallLogSchema {
    /// Build the statements from the SQL type names of `call_logs.id` and
    /// `campaign_question."campaignId"`
    pub fn new(call_id_type: &str, campaign_id_type: &str) -> Result<Self, DomainError> {
        let call_id_type = checked_type_name(call_id_type)?;
        let campaign_id_type = checked_type_name(campaign_id_type)?;

        Ok(Self {
            find_call: format!(
                r#"
                SELECT id::text AS id,
                       COALESCE(recording_url, '') AS recording_url,
                       COALESCE("campaignId"::text, '') AS campaign_id,
                       agent_name::text AS agent_name,
                       campaign_name::text AS campaign_name,
                       caller_id_number::text AS caller_number
                FROM "smartFlo".call_logs
                WHERE id = $1::{call_id_type}
                "#
            ),
            active_questions: format!(
                r#"
                SELECT q.id::text AS id, COALESCE(q.label, '') AS label, q.details
                FROM "smartFlo".question q
                INNER JOIN "smartFlo".campaign_question cq ON q.id = cq."questionId"
                WHERE q."isActive" = true AND cq."campaignId" = $1::{campaign_id_type}
                ORDER BY q.id::text
                "#
            ),
            replace_analysis: format!(
                r#"
                UPDATE "smartFlo".call_logs
                SET "callAnalysis" = $1
                WHERE id = $2::{call_id_type}
                "#
            ),
        })
    }

    /// Read the key column types from the catalog
    pub async fn load(pool: &PgPool, timeout: Duration) -> Result<Self, DomainError> {
        let call_id_type = column_type(pool, timeout, r#""smartFlo".call_logs"#, "id").await?;
        let campaign_id_type = column_type(
            pool,
            timeout,
            r#""smartFlo".campaign_question"#,
            "campaignId",
        )
        .await?;

        tracing::info!(%call_id_type, %campaign_id_type, "Call store key types resolved");
        Self::new(&call_id_type, &campaign_id_type)
    }
}

async fn column_type(
    pool: &PgPool,
    timeout: Duration,
    table: &str,
    column: &str,
) -> Result<String, DomainError> {
    let lookup = sqlx::query_scalar::<_, String>(COLUMN_TYPE_SQL)
        .bind(table)
        .bind(column)
        .fetch_optional(pool);

    deadline(timeout, "column type lookup", lookup)
        .await?
        .map_err(|e| DomainError::Repository(e.to_string()))?
        .ok_or_else(|| DomainError::Repository(format!("column {table}.{column} not found")))
}

/// Catalog type names are spliced into SQL; accept only what `format_type` emits
fn checked_type_name(name: &str) -> Result<&str, DomainError> {
    let name = name.trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || " _(),\"".contains(c);
    if name.is_empty() || !name.chars().all(allowed) {
        return Err(DomainError::InvalidData(format!(
            "unsupported key column type: {name:?}"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_cast_to_column_types() {
        let schema = CallLogSchema::new("uuid", "bigint").unwrap();
        assert!(schema.find_call.contains("WHERE id = $1::uuid"));
        assert!(schema.replace_analysis.contains("WHERE id = $2::uuid"));
        assert!(schema
            .active_questions
            .contains(r#"cq."campaignId" = $1::bigint"#));

        for sql in [&schema.find_call, &schema.replace_analysis] {
            assert!(!sql.contains("WHERE id::text"));
        }
    }

    #[test]
    fn test_parameterised_type_names_accepted() {
        let schema = CallLogSchema::new("character varying(64)", "text").unwrap();
        assert!(schema.find_call.contains("$1::character varying(64)"));
    }

    #[test]
    fn test_unexpected_type_names_rejected() {
        for bad in ["", "uuid; DROP TABLE x", "text--"] {
            assert!(matches!(
                CallLogSchema::new(bad, "text"),
                Err(DomainError::InvalidData(_))
            ));
        }
    }
}
