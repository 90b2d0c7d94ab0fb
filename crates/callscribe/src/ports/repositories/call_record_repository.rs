//! Call Record Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, CallId, CallRecord};

/// Read access to call log rows
#[async_trait]
pub trait CallRecordRepository: Send + Sync {
    /// Find a call by ID
    async fn find_call(&self, id: &CallId) -> Result<Option<CallRecord>, DomainError>;
}
