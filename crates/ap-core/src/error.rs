//! Unified error type for audioprep.
//!
//! Every failure of validation, probing, extraction, or splitting is funneled
//! into [`Error`]. Nothing is retried internally; errors surface to the caller
//! as soon as they happen.

use std::path::PathBuf;
use std::time::Duration;

/// Unified error type covering all failure modes in audioprep.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source path does not exist.
    #[error("File not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// Input failed validation (unrecognized media type, bad arguments).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An external tool is missing or non-functional.
    #[error("{tool} is not available on this system; install it (e.g. 'sudo apt install ffmpeg') or set its path in the config")]
    ToolUnavailable {
        /// Name of the tool.
        tool: String,
    },

    /// An external tool exited with a non-zero status.
    #[error("{tool} exited with {}: {stderr}", exit_description(.code))]
    SubprocessFailure {
        /// Name of the tool that failed.
        tool: String,
        /// Exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// Trimmed standard error of the process.
        stderr: String,
    },

    /// A tool ran successfully but its output lacked an expected field.
    #[error("Malformed {tool} output: {message}")]
    MalformedOutput {
        /// Name of the tool whose output was parsed.
        tool: String,
        /// What was missing or unparseable.
        message: String,
    },

    /// The wait on a tool was interrupted (Ctrl-C or cancellation).
    #[error("{tool} was interrupted")]
    Interrupted {
        /// Name of the tool that was running.
        tool: String,
    },

    /// A tool exceeded the configured deadline.
    #[error("{tool} timed out after {after:?}")]
    TimedOut {
        /// Name of the tool that was running.
        tool: String,
        /// The deadline that expired.
        after: Duration,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound { path: path.into() }
    }

    /// Convenience constructor for [`Error::ToolUnavailable`].
    pub fn tool_unavailable(tool: impl Into<String>) -> Self {
        Error::ToolUnavailable { tool: tool.into() }
    }

    /// Convenience constructor for [`Error::SubprocessFailure`].
    pub fn subprocess(tool: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Error::SubprocessFailure {
            tool: tool.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Convenience constructor for [`Error::MalformedOutput`].
    pub fn malformed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedOutput {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Interrupted`].
    pub fn interrupted(tool: impl Into<String>) -> Self {
        Error::Interrupted { tool: tool.into() }
    }

    /// The exit code carried by a [`Error::SubprocessFailure`], if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::SubprocessFailure { code, .. } => *code,
            _ => None,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("/media/missing.mp4");
        assert_eq!(err.to_string(), "File not found: /media/missing.mp4");
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("text/plain is not audio or video".into());
        assert_eq!(
            err.to_string(),
            "Validation error: text/plain is not audio or video"
        );
    }

    #[test]
    fn tool_unavailable_display() {
        let err = Error::tool_unavailable("ffmpeg");
        assert!(err.to_string().starts_with("ffmpeg is not available"));
    }

    #[test]
    fn subprocess_display_with_code() {
        let err = Error::subprocess("ffmpeg", Some(1), "Invalid data found");
        assert_eq!(
            err.to_string(),
            "ffmpeg exited with exit code 1: Invalid data found"
        );
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn subprocess_display_without_code() {
        let err = Error::subprocess("ffmpeg", None, "");
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn malformed_display() {
        let err = Error::malformed("ffprobe", "format.duration missing");
        assert_eq!(
            err.to_string(),
            "Malformed ffprobe output: format.duration missing"
        );
    }

    #[test]
    fn interrupted_display() {
        let err = Error::interrupted("ffmpeg");
        assert_eq!(err.to_string(), "ffmpeg was interrupted");
    }

    #[test]
    fn timed_out_display() {
        let err = Error::TimedOut {
            tool: "ffprobe".into(),
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "ffprobe timed out after 5s");
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.exit_code(), None);
    }
}
