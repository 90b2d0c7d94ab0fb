//! Repository Ports
//!
//! Abstract interfaces for the relational call store.

mod call_analysis_repository;
mod call_record_repository;
mod question_repository;

pub use call_analysis_repository::*;
pub use call_record_repository::*;
pub use question_repository::*;

/// Everything the pipeline needs from the call store in one session
pub trait CallStore: CallRecordRepository + QuestionRepository + CallAnalysisRepository {}

impl<T> CallStore for T where
    T: CallRecordRepository + QuestionRepository + CallAnalysisRepository
{
}
