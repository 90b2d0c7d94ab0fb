//! Application Layer (Use Cases)
//!
//! Orchestrates the call-processing pipeline across the ports.

mod call_pipeline;
mod pipeline_error;

pub use call_pipeline::CallPipeline;
pub use pipeline_error::{PipelineError, PipelineStage};
