//! Question Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Question};

/// Read access to the question catalog
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Active questions linked to the campaign, ordered by question id
    async fn active_questions_for_campaign(
        &self,
        campaign_id: &str,
    ) -> Result<Vec<Question>, DomainError>;
}
