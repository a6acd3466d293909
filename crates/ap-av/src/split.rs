//! Size-bounded splitting.
//!
//! The number of parts is `ceil(size / budget)` and every part gets the same
//! duration, cut on millisecond boundaries. That assumes a constant bitrate: parts are measured after they
//! are cut and an oversized one is logged, but never re-cut.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ap_core::{Error, MediaFile, MediaKind, Result, SplitResult};

use crate::runner::ProcessRunner;
use crate::transcoder::Transcoder;

/// How a file will be cut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlan {
    pub parts: u64,
    pub part_duration: Duration,
}

impl SplitPlan {
    /// Start offset of the 0-based part `index`.
    pub fn start_of(&self, index: u64) -> Duration {
        self.part_duration.mul_f64(index as f64)
    }

    /// The `(start, length)` window cut for part `index`, on whole
    /// milliseconds.
    ///
    /// Both ends are rounded, so each part ends exactly where the next one
    /// starts and the lengths add up to the rounded total.
    pub fn window(&self, index: u64) -> (Duration, Duration) {
        let start = round_millis(self.start_of(index));
        let end = round_millis(self.start_of(index + 1));
        (start, end.saturating_sub(start))
    }
}

fn round_millis(d: Duration) -> Duration {
    let millis = (d.as_nanos() + 500_000) / 1_000_000;
    Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
}

/// Compute the equal-duration plan for a file of `size_bytes` lasting
/// `duration` under a `max_size_bytes` budget.
pub fn plan_split(size_bytes: u64, max_size_bytes: u64, duration: Duration) -> Result<SplitPlan> {
    if max_size_bytes == 0 {
        return Err(Error::Validation("maximum part size must be greater than zero".into()));
    }

    let parts = size_bytes.div_ceil(max_size_bytes).max(1);
    let part_duration = duration.div_f64(parts as f64);

    // Cuts are placed on whole milliseconds.
    if parts > 1 && part_duration < Duration::from_millis(1) {
        return Err(Error::Validation(format!(
            "a {max_size_bytes} byte budget needs {parts} parts of {:.6}s each; \
             parts shorter than a millisecond cannot be cut",
            part_duration.as_secs_f64()
        )));
    }

    Ok(SplitPlan {
        parts,
        part_duration,
    })
}

/// `<dir>/<stem>-part<number>.<extension>`, `number` being 1-based.
pub fn part_path(source: &Path, number: u64, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    source.with_file_name(format!("{stem}-part{number}.{extension}"))
}

/// Split `file` into parts of roughly at most `max_size_bytes` each.
///
/// A file already within budget is returned as the only part and no tool
/// runs. Otherwise each part is cut in order; the first failure aborts and
/// leaves the parts produced so far on disk.
pub fn split_by_size<R: ProcessRunner>(
    transcoder: &Transcoder<R>,
    file: &MediaFile,
    max_size_bytes: u64,
) -> Result<SplitResult> {
    if max_size_bytes == 0 {
        return Err(Error::Validation("maximum part size must be greater than zero".into()));
    }

    let size = file.require_size()?;
    if size <= max_size_bytes {
        tracing::info!(
            "{} is {size} bytes, within the {max_size_bytes} byte budget; not splitting",
            file.path.display()
        );
        return Ok(SplitResult::unsplit(file.clone()));
    }

    let duration = file.require_duration()?;
    let plan = plan_split(size, max_size_bytes, duration)?;
    let extension = &transcoder.encode().extension;

    tracing::info!(
        "Splitting {} ({size} bytes, {:.3}s) into {} parts of {:.3}s",
        file.path.display(),
        duration.as_secs_f64(),
        plan.parts,
        plan.part_duration.as_secs_f64()
    );

    let mut parts = Vec::new();
    for index in 0..plan.parts {
        let output = part_path(&file.path, index + 1, extension);
        let (start, length) = plan.window(index);
        transcoder.cut_segment(&file.path, &output, start, length)?;

        let part = MediaFile::new(&output, MediaKind::Audio)
            .with_duration(length)
            .stat_size()?;

        if let Some(part_size) = part.size_bytes.filter(|&s| s > max_size_bytes) {
            tracing::warn!(
                "{} is {part_size} bytes, over the {max_size_bytes} byte budget",
                output.display()
            );
        }

        parts.push(part);
    }

    Ok(SplitResult {
        source: file.path.clone(),
        parts,
    })
}
