//! Test doubles for code that runs external tools.
//!
//! Enabled for this crate's own tests and, through the `test-util` feature,
//! for downstream test suites.

use std::path::PathBuf;

use ap_core::{Error, Result};
use parking_lot::Mutex;

use crate::command::{ToolCommand, ToolOutput};
use crate::runner::ProcessRunner;
use crate::tools::{ToolRegistry, FFMPEG, FFPROBE};

/// One recorded [`FakeRunner`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Bare program name (`ffmpeg`, `ffprobe`).
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn is_version_probe(&self) -> bool {
        self.args == ["-version"]
    }

    /// The last argument, which is the output file for ffmpeg runs.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.args.last().map(PathBuf::from)
    }

    /// The argument following `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        let pos = self.args.iter().position(|a| a == flag)?;
        self.args.get(pos + 1).map(String::as_str)
    }
}

impl From<&ToolCommand> for Invocation {
    fn from(cmd: &ToolCommand) -> Self {
        Self {
            program: cmd.program_name(),
            args: cmd.get_args().to_vec(),
        }
    }
}

type Handler = dyn Fn(&Invocation) -> Result<ToolOutput> + Send + Sync;

/// A [`ProcessRunner`] that records every call and answers from a handler
/// instead of spawning processes.
pub struct FakeRunner {
    handler: Box<Handler>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn new(handler: impl Fn(&Invocation) -> Result<ToolOutput> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like a working ffmpeg/ffprobe install: version probes
    /// succeed, ffprobe reports `duration_secs`, and every ffmpeg run writes
    /// `output_bytes` bytes to its output path.
    pub fn media_suite(duration_secs: f64, output_bytes: usize) -> Self {
        Self::new(move |inv| {
            if inv.is_version_probe() {
                return Ok(ToolOutput::ok(format!("{} version 6.1-fake", inv.program)));
            }
            match inv.program.as_str() {
                FFPROBE => Ok(ToolOutput::ok(format!(
                    r#"{{"format":{{"duration":"{duration_secs:.6}"}}}}"#
                ))),
                FFMPEG => {
                    if let Some(output) = inv.output_path() {
                        std::fs::write(output, vec![0u8; output_bytes])?;
                    }
                    Ok(ToolOutput::ok(""))
                }
                other => Err(Error::tool_unavailable(other)),
            }
        })
    }

    /// A registry pointing ffmpeg and ffprobe at fake paths.
    pub fn registry() -> ToolRegistry {
        ToolRegistry::default()
            .with_tool(FFMPEG, "/fake/bin/ffmpeg")
            .with_tool(FFPROBE, "/fake/bin/ffprobe")
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Calls made to `program`, in order.
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.program == program)
            .cloned()
            .collect()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput> {
        let invocation = Invocation::from(cmd);
        self.calls.lock().push(invocation.clone());
        (self.handler)(&invocation)
    }
}
