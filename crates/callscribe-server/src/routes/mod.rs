//! Callscribe API Routes
//!
//! - /calls/process - Transcribe a call and answer its campaign questions

pub mod process;
pub mod swagger;
