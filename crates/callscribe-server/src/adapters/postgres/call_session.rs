//! PostgreSQL implementation of the call store ports
//!
//! One session per pipeline run: it owns a single pooled connection, which
//! goes back to the pool when the session is dropped, whatever the outcome.
//! Acquiring and every statement are bounded by the configured timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{pool::PoolConnection, types::Json, PgPool, Postgres};
use tokio::sync::Mutex;

use callscribe::{
    CallAnalysis, CallAnalysisRepository, CallId, CallRecord, CallRecordRepository, DomainError,
    Question, QuestionRepository,
};

use super::schema::CallLogSchema;

/// Pool plus the resolved statements; hands out one session per run
#[derive(Clone)]
pub struct PgCallStore {
    pool: PgPool,
    schema: Arc<CallLogSchema>,
    timeout: Duration,
}

impl PgCallStore {
    pub fn new(pool: PgPool, schema: CallLogSchema, timeout: Duration) -> Self {
        Self {
            pool,
            schema: Arc::new(schema),
            timeout,
        }
    }

    /// Acquire a connection for the duration of one run
    pub async fn session(&self) -> Result<PgCallSession, DomainError> {
        let mut conn = deadline(self.timeout, "acquire connection", self.pool.acquire())
            .await?
            .map_err(|e| DomainError::Repository(format!("acquire connection: {e}")))?;

        // Server-side bound as well, so a statement abandoned by the client stops running
        let set_timeout = format!("SET statement_timeout = {}", self.timeout.as_millis());
        deadline(
            self.timeout,
            "set statement timeout",
            sqlx::query(&set_timeout).execute(&mut *conn),
        )
        .await?
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(PgCallSession {
            conn: Mutex::new(conn),
            schema: self.schema.clone(),
            timeout: self.timeout,
        })
    }
}

/// PostgreSQL call store bound to one connection
pub struct PgCallSession {
    conn: Mutex<PoolConnection<Postgres>>,
    schema: Arc<CallLogSchema>,
    timeout: Duration,
}

/// Run `fut`, failing with a repository error once `timeout` has elapsed
pub(super) async fn deadline<F: Future>(
    timeout: Duration,
    what: &str,
    fut: F,
) -> Result<F::Output, DomainError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        tracing::warn!(
            operation = what,
            timeout_secs = timeout.as_secs_f64(),
            "Database call timed out"
        );
        DomainError::Repository(format!("{what} timed out after {:?}", timeout))
    })
}

/// A key that cannot be converted to the column type matches no row
fn is_unmatchable_key(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == "22P02" || code == "22003")
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CallRow {
    id: String,
    recording_url: String,
    campaign_id: String,
    agent_name: Option<String>,
    campaign_name: Option<String>,
    caller_number: Option<String>,
}

impl From<CallRow> for CallRecord {
    fn from(row: CallRow) -> Self {
        Self {
            id: CallId::new(row.id),
            recording_url: row.recording_url,
            campaign_id: row.campaign_id,
            agent_name: row.agent_name,
            campaign_name: row.campaign_name,
            caller_number: row.caller_number,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    id: String,
    label: String,
    details: Option<serde_json::Value>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = DomainError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let details = row.details.unwrap_or(serde_json::Value::Null);
        Question::from_details(row.id, &row.label, &details)
    }
}

#[async_trait]
impl CallRecordRepository for PgCallSession {
    async fn find_call(&self, id: &CallId) -> Result<Option<CallRecord>, DomainError> {
        let query = async {
            let mut conn = self.conn.lock().await;
            sqlx::query_as::<_, CallRow>(&self.schema.find_call)
                .bind(id.as_str())
                .fetch_optional(&mut **conn)
                .await
        };

        match deadline(self.timeout, "find call", query).await? {
            Ok(row) => Ok(row.map(Into::into)),
            Err(e) if is_unmatchable_key(&e) => {
                tracing::debug!(call_id = %id, "Call id does not fit the key column");
                Ok(None)
            }
            Err(e) => Err(DomainError::Repository(e.to_string())),
        }
    }
}

#[async_trait]
impl QuestionRepository for PgCallSession {
    async fn active_questions_for_campaign(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<Question>, DomainError> {
        let query = async {
            let mut conn = self.conn.lock().await;
            sqlx::query_as::<_, QuestionRow>(&self.schema.active_questions)
                .bind(campaign_id)
                .fetch_all(&mut **conn)
                .await
        };

        let rows = deadline(self.timeout, "load questions", query)
            .await?
            .map_err(|e| DomainError::Repository(e.to_string()))?;

        rows.into_iter().map(Question::try_from).collect()
    }
}

#[async_trait]
impl CallAnalysisRepository for PgCallSession {
    async fn replace_analysis(
        &self,
        id: &CallId,
        analysis: &CallAnalysis,
    ) -> Result<(), DomainError> {
        let query = async {
            let mut conn = self.conn.lock().await;
            sqlx::query(&self.schema.replace_analysis)
                .bind(Json(analysis))
                .bind(id.as_str())
                .execute(&mut **conn)
                .await
        };

        let result = match deadline(self.timeout, "save analysis", query).await? {
            Ok(result) => result,
            Err(e) if is_unmatchable_key(&e) => {
                return Err(DomainError::not_found("Call", id.as_str()))
            }
            Err(e) => return Err(DomainError::Repository(e.to_string())),
        };

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Call", id.as_str()));
        }

        tracing::info!(call_id = %id, "Call analysis saved");
        Ok(())
    }
}
