//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the pipeline
//! interacts with external systems (call store, audio host, AI model).
//!
//! Implementations of these traits live in the server crate.

pub mod repositories;
pub mod services;

// Re-exports
pub use repositories::*;
pub use services::*;
