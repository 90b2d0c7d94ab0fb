//! Callscribe API Data Models

mod process;

pub use process::*;
