//! # ap-av
//!
//! External tool management, audio extraction, probing, and size-bounded
//! splitting for audioprep.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find ffmpeg and ffprobe from
//!   config overrides or `PATH`.
//! - **Command execution** ([`ToolCommand`], [`ProcessRunner`]) -- a command
//!   builder and an injectable runner. [`SystemRunner`] spawns real
//!   processes and turns Ctrl-C into [`ap_core::Error::Interrupted`].
//! - **Transcoding** ([`Transcoder`]) -- availability checks, audio
//!   extraction, duration probing, and segment cutting.
//! - **Splitting** ([`split_by_size`]) -- cut an oversized file into
//!   equal-duration parts sized to a byte budget.

pub mod actions;
pub mod command;
pub mod probe;
pub mod runner;
pub mod split;
pub mod tools;
pub mod transcoder;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use probe::parse_duration_report;
pub use runner::{ProcessRunner, SystemRunner};
pub use split::{part_path, plan_split, split_by_size, SplitPlan};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry, FFMPEG, FFPROBE};
pub use transcoder::Transcoder;
