//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod gemini;
pub mod http_audio;
pub mod postgres;

// Re-exports
pub use gemini::GeminiTranscriptionModel;
pub use http_audio::HttpAudioFetcher;
pub use postgres::{CallLogSchema, PgCallStore};
