//! Builder describing an external tool invocation, and its captured output.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ap_core::{Error, Result};

/// Output captured from a tool execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

impl ToolOutput {
    /// A successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A run that exited with `code` and wrote `stderr`.
    pub fn exited(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`Error::SubprocessFailure`].
    pub fn check(self, tool: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::subprocess(tool, self.code, self.stderr.trim()))
        }
    }
}

/// A builder for constructing external tool invocations.
///
/// The command only describes what to run; a
/// [`ProcessRunner`](crate::ProcessRunner) executes it.
///
/// # Example
///
/// ```
/// use ap_av::ToolCommand;
/// use std::path::PathBuf;
///
/// let mut cmd = ToolCommand::new(PathBuf::from("ffprobe"));
/// cmd.args(["-v", "error", "-show_entries", "format=duration"])
///     .args(["-of", "json"])
///     .arg("talk.mp3");
/// assert_eq!(
///     cmd.to_string(),
///     "ffprobe -v error -show_entries format=duration -of json talk.mp3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time. Without one the runner waits forever.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = Some(d);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Bare executable name, used in logs and errors.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_args() {
        let mut cmd = ToolCommand::new(PathBuf::from("/usr/bin/ffmpeg"));
        cmd.arg("-y").args(["-i", "in.mp4"]).timeout(Duration::from_secs(5));

        assert_eq!(cmd.get_args(), ["-y", "-i", "in.mp4"]);
        assert_eq!(cmd.get_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(cmd.program_name(), "ffmpeg");
    }

    #[test]
    fn display_quotes_spaces() {
        let mut cmd = ToolCommand::new(PathBuf::from("ffmpeg"));
        cmd.args(["-i", "my talk.mp4"]);
        assert_eq!(cmd.to_string(), "ffmpeg -i \"my talk.mp4\"");
    }

    #[test]
    fn check_maps_non_zero_exit() {
        let ok = ToolOutput::ok("fine").check("ffmpeg").unwrap();
        assert_eq!(ok.stdout, "fine");

        let err = ToolOutput::exited(183, "  Conversion failed!\n")
            .check("ffmpeg")
            .unwrap_err();
        match err {
            Error::SubprocessFailure { tool, code, stderr } => {
                assert_eq!(tool, "ffmpeg");
                assert_eq!(code, Some(183));
                assert_eq!(stderr, "Conversion failed!");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn signal_termination_is_failure() {
        let output = ToolOutput {
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!output.success());
        assert!(output.check("ffprobe").is_err());
    }
}
