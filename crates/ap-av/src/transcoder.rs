//! The [`Transcoder`] service: tools, encoding settings, and a runner.
//!
//! Operations live next to their command lines: extraction and cutting in
//! [`crate::actions`], duration probing in [`crate::probe`].

use std::path::PathBuf;
use std::time::Duration;

use ap_core::config::{Config, EncodeConfig};
use ap_core::{Error, MediaFile, Result, SplitResult};

use crate::command::{ToolCommand, ToolOutput};
use crate::runner::ProcessRunner;
use crate::tools::{version_probe, ToolRegistry};

/// Runs ffmpeg/ffprobe operations through an injected [`ProcessRunner`].
pub struct Transcoder<R> {
    runner: R,
    tools: ToolRegistry,
    encode: EncodeConfig,
    timeout: Option<Duration>,
}

impl<R: ProcessRunner> Transcoder<R> {
    /// Create a transcoder with default encoding settings and no deadline.
    pub fn new(runner: R, tools: ToolRegistry) -> Self {
        Self {
            runner,
            tools,
            encode: EncodeConfig::default(),
            timeout: None,
        }
    }

    /// Discover tools and take encoding settings and deadline from `config`.
    pub fn from_config(runner: R, config: &Config) -> Self {
        Self::new(runner, ToolRegistry::discover(&config.tools))
            .with_encode(config.encode.clone())
            .with_timeout(config.tools.timeout())
    }

    pub fn with_encode(mut self, encode: EncodeConfig) -> Self {
        self.encode = encode;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn encode(&self) -> &EncodeConfig {
        &self.encode
    }

    /// Whether `tool` is registered and answers `-version` successfully.
    ///
    /// Every failure mode (missing, non-zero exit, launch error,
    /// interruption) counts as unavailable.
    pub fn is_available(&self, tool: &str) -> bool {
        let Some(path) = self.tools.path(tool) else {
            tracing::debug!("{tool} is not registered");
            return false;
        };

        match self.runner.run(&version_probe(path)) {
            Ok(output) if output.success() => true,
            Ok(output) => {
                tracing::debug!("{tool} -version exited with {:?}", output.code);
                false
            }
            Err(e) => {
                tracing::debug!("{tool} -version failed: {e}");
                false
            }
        }
    }

    /// Split `file` into parts of at most `max_size_bytes` (approximately).
    /// See [`crate::split_by_size`].
    pub fn split(&self, file: &MediaFile, max_size_bytes: u64) -> Result<SplitResult> {
        crate::split::split_by_size(self, file, max_size_bytes)
    }

    /// Path of `tool` after a successful availability check.
    pub(crate) fn ensure_available(&self, tool: &str) -> Result<PathBuf> {
        if !self.is_available(tool) {
            return Err(Error::tool_unavailable(tool));
        }
        Ok(self.tools.require(tool)?.path.clone())
    }

    /// Path of a registered `tool`, without probing it.
    pub(crate) fn require(&self, tool: &str) -> Result<PathBuf> {
        Ok(self.tools.require(tool)?.path.clone())
    }

    /// A command for `program` carrying the configured deadline.
    pub(crate) fn command(&self, program: PathBuf) -> ToolCommand {
        let mut cmd = ToolCommand::new(program);
        if let Some(limit) = self.timeout {
            cmd.timeout(limit);
        }
        cmd
    }

    /// Run `cmd` and fail on a non-zero exit.
    pub(crate) fn run_checked(&self, tool: &str, cmd: &ToolCommand) -> Result<ToolOutput> {
        self.runner.run(cmd)?.check(tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRunner;
    use crate::tools::{FFMPEG, FFPROBE};

    #[test]
    fn available_when_version_probe_succeeds() {
        let tx = Transcoder::new(FakeRunner::media_suite(10.0, 0), FakeRunner::registry());
        assert!(tx.is_available(FFMPEG));
        assert!(tx.is_available(FFPROBE));
    }

    #[test]
    fn unregistered_tool_is_unavailable_without_spawning() {
        let tx = Transcoder::new(FakeRunner::media_suite(10.0, 0), ToolRegistry::default());
        assert!(!tx.is_available(FFMPEG));
        assert!(tx.runner().calls().is_empty());
    }

    #[test]
    fn every_probe_failure_means_unavailable() {
        let exits = Transcoder::new(
            FakeRunner::new(|_| Ok(ToolOutput::exited(127, "not found"))),
            FakeRunner::registry(),
        );
        assert!(!exits.is_available(FFMPEG));

        let launch_fails = Transcoder::new(
            FakeRunner::new(|_| Err(Error::tool_unavailable("ffmpeg"))),
            FakeRunner::registry(),
        );
        assert!(!launch_fails.is_available(FFMPEG));

        let interrupted = Transcoder::new(
            FakeRunner::new(|_| Err(Error::interrupted("ffmpeg"))),
            FakeRunner::registry(),
        );
        assert!(!interrupted.is_available(FFMPEG));
    }

    #[test]
    fn commands_carry_configured_deadline() {
        let tx = Transcoder::new(FakeRunner::media_suite(1.0, 0), FakeRunner::registry())
            .with_timeout(Some(Duration::from_secs(30)));
        let cmd = tx.command(PathBuf::from("ffmpeg"));
        assert_eq!(cmd.get_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn from_config_applies_encode_settings() {
        let mut config = Config::default();
        config.encode.bitrate = "96k".into();
        config.tools.timeout_secs = Some(120);

        let tx = Transcoder::from_config(FakeRunner::media_suite(1.0, 0), &config);
        assert_eq!(tx.encode().bitrate, "96k");
        assert_eq!(
            tx.command(PathBuf::from("ffprobe")).get_timeout(),
            Some(Duration::from_secs(120))
        );
    }
}
