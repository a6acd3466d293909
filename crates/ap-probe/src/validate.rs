//! Existence checks and audio/video classification.

use std::path::Path;

use ap_core::{Error, MediaFile, MediaKind, Result};

use crate::sniff::detect_mime;

/// Fail with [`Error::NotFound`] unless `path` names an existing entry.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.try_exists()? {
        tracing::info!("File found at: {}", path.display());
        Ok(())
    } else {
        Err(Error::not_found(path))
    }
}

/// Classify a file as audio or video from its content.
pub fn classify(path: &Path) -> Result<MediaKind> {
    let mime = detect_mime(path)?;
    tracing::debug!("{} sniffed as {mime}", path.display());
    classify_mime(mime)
}

/// Map a detected MIME type to a [`MediaKind`], rejecting everything that is
/// neither audio nor video.
pub fn classify_mime(mime: &str) -> Result<MediaKind> {
    MediaKind::from_mime(mime).ok_or_else(|| {
        Error::Validation(format!(
            "invalid file type {mime}; please provide an audio or video file"
        ))
    })
}

/// Check that `path` exists and classify it, returning an unprobed record.
pub fn validate(path: &Path) -> Result<MediaFile> {
    ensure_exists(path)?;
    let kind = classify(path)?;
    tracing::info!("File type validated: {kind} file");
    Ok(MediaFile::new(path, kind))
}
