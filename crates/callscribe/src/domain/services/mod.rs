//! Domain Services
//!
//! Stateless logic around the model exchange:
//! - prompt: builds the instruction sent alongside the audio
//! - reply_parser: recovers transcription and answers from the reply text

mod prompt;
mod reply_parser;

pub use prompt::*;
pub use reply_parser::*;
