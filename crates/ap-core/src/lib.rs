//! ap-core: shared error type, media data model, and configuration types.
//!
//! This crate is the foundational dependency for the other ap-* crates.

pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::*;
