//! audioprep - Media validation, audio extraction, and size-bounded splitting
//!
//! This library crate exposes the config loader and the end-to-end flows for
//! integration testing.

pub mod config;
pub mod processor;
