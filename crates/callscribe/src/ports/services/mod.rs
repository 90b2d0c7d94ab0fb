//! Service Ports
//!
//! Abstract interfaces for external network services.

mod audio_fetcher;
mod transcription_model;

pub use audio_fetcher::*;
pub use transcription_model::*;
