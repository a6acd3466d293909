//! Application configuration types.
//!
//! The top-level [`Config`] carries the tool, encoding, and splitting
//! sections. Every section defaults sensibly so an empty file is valid.
//! Reading the file is left to the caller.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default part budget: 25 MiB, the usual upload cap of transcription APIs.
pub const DEFAULT_MAX_PART_SIZE: u64 = 25 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub encode: EncodeConfig,
    pub split: SplitConfig,
}

impl Config {
    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (name, path) in [
            ("tools.ffmpeg_path", &self.tools.ffmpeg_path),
            ("tools.ffprobe_path", &self.tools.ffprobe_path),
        ] {
            if let Some(p) = path {
                if !p.exists() {
                    warnings.push(format!(
                        "{name} {} does not exist; falling back to PATH lookup",
                        p.display()
                    ));
                }
            }
        }

        if self.tools.timeout_secs == Some(0) {
            warnings.push("tools.timeout_secs is 0; every tool run will time out".into());
        }

        if !is_valid_bitrate(&self.encode.bitrate) {
            warnings.push(format!(
                "encode.bitrate '{}' does not look like an ffmpeg bitrate (e.g. 64k)",
                self.encode.bitrate
            ));
        }

        if self.encode.extension.is_empty() || self.encode.extension.contains('.') {
            warnings.push(format!(
                "encode.extension '{}' should be a bare extension such as 'mp3'",
                self.encode.extension
            ));
        }

        warnings
    }
}

fn is_valid_bitrate(bitrate: &str) -> bool {
    let digits = bitrate.trim_end_matches(['k', 'K', 'm', 'M']);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// External tool locations and limits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    /// Optional deadline for a single tool run. Unset means wait forever.
    pub timeout_secs: Option<u64>,
}

impl ToolsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Encoding parameters for extracted audio and cut segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeConfig {
    /// ffmpeg audio codec name.
    pub codec: String,
    /// ffmpeg bitrate string.
    pub bitrate: String,
    /// Extension of produced files, without the dot.
    pub extension: String,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            codec: "libmp3lame".into(),
            bitrate: "64k".into(),
            extension: "mp3".into(),
        }
    }
}

/// Size-bounded splitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Byte budget per part.
    pub max_part_size: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_part_size: DEFAULT_MAX_PART_SIZE,
        }
    }
}
