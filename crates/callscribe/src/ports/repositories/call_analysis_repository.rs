//! Call Analysis Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, CallAnalysis, CallId};

/// Write access to a call's analysis blob
#[async_trait]
pub trait CallAnalysisRepository: Send + Sync {
    /// Replace the stored analysis for a call.
    ///
    /// Overwrites any previous analysis; returns `NotFound` if the call row is gone.
    async fn replace_analysis(
        &self,
        id: &CallId,
        analysis: &CallAnalysis,
    ) -> Result<(), DomainError>;
}
