//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod answer_set;
mod answer_type;
mod audio_payload;

pub use answer_set::*;
pub use answer_type::*;
pub use audio_payload::*;
