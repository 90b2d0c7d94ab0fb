//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - CallRecord: Stored metadata for one phone call
//! - Question: Campaign question to answer from the audio
//! - CallAnalysis: Persisted transcription and answers
//! - PipelineResult: Outcome returned to the caller

mod call_analysis;
mod call_record;
mod question;

pub use call_analysis::*;
pub use call_record::*;
pub use question::*;
