//! Media data model: kinds, files, and split results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

/// Top-level media category of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Map a MIME type (`audio/mpeg`, `video/mp4`, ...) to a kind by its
    /// top-level type. Anything other than `audio` or `video` yields `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top = mime.split('/').next().unwrap_or("").trim();
        if top.eq_ignore_ascii_case("audio") {
            Some(Self::Audio)
        } else if top.eq_ignore_ascii_case("video") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

// ---------------------------------------------------------------------------
// MediaFile
// ---------------------------------------------------------------------------

/// A classified media file.
///
/// `duration` and `size_bytes` start out unset: the duration is only known
/// after an ffprobe run, the size after a filesystem stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    #[serde(default, with = "opt_duration_secs", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl MediaFile {
    /// Create an unprobed record.
    pub fn new(path: impl Into<PathBuf>, kind: MediaKind) -> Self {
        Self {
            path: path.into(),
            kind,
            duration: None,
            size_bytes: None,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = Some(size_bytes);
        self
    }

    /// Stat the file and record its size.
    pub fn stat_size(self) -> Result<Self> {
        let size = std::fs::metadata(&self.path)?.len();
        Ok(self.with_size(size))
    }

    /// The probed duration, or a validation error if it was never probed.
    pub fn require_duration(&self) -> Result<Duration> {
        self.duration.ok_or_else(|| {
            Error::Validation(format!("duration of {} has not been probed", self.path.display()))
        })
    }

    /// The measured size, or a validation error if it was never measured.
    pub fn require_size(&self) -> Result<u64> {
        self.size_bytes.ok_or_else(|| {
            Error::Validation(format!("size of {} has not been measured", self.path.display()))
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ---------------------------------------------------------------------------
// SplitResult
// ---------------------------------------------------------------------------

/// Ordered output of a size-bounded split, one entry per segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitResult {
    pub source: PathBuf,
    pub parts: Vec<MediaFile>,
}

impl SplitResult {
    /// A result holding the source file itself as the only part.
    pub fn unsplit(file: MediaFile) -> Self {
        Self {
            source: file.path.clone(),
            parts: vec![file],
        }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Whether new segment files were produced.
    pub fn is_split(&self) -> bool {
        self.parts.len() > 1 || self.parts.iter().any(|p| p.path != self.source)
    }

    /// Sum of the recorded part durations (unprobed parts count as zero).
    pub fn total_duration(&self) -> Duration {
        self.parts.iter().filter_map(|p| p.duration).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaFile> {
        self.parts.iter()
    }
}

impl IntoIterator for SplitResult {
    type Item = MediaFile;
    type IntoIter = std::vec::IntoIter<MediaFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}

/// Serde helpers to (de)serialize `Option<Duration>` as fractional seconds.
mod opt_duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_f64(d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<f64>::deserialize(deserializer)?;
        match secs {
            Some(s) if s.is_finite() && s >= 0.0 => Ok(Some(Duration::from_secs_f64(s))),
            Some(s) => Err(serde::de::Error::custom(format!("invalid duration: {s}"))),
            None => Ok(None),
        }
    }
}
