//! Duration probing via ffprobe.
//!
//! Shells out to `ffprobe -v error -show_entries format=duration -of json`
//! and reads `format.duration` from the report.

use std::path::Path;
use std::time::Duration;

use ap_core::{Error, Result};
use serde::Deserialize;

use crate::runner::ProcessRunner;
use crate::tools::FFPROBE;
use crate::transcoder::Transcoder;

impl<R: ProcessRunner> Transcoder<R> {
    /// Measure the container duration of `audio`.
    pub fn probe_duration(&self, audio: &Path) -> Result<Duration> {
        let ffprobe = self.ensure_available(FFPROBE)?;

        let mut cmd = self.command(ffprobe);
        cmd.args(["-v", "error"]);
        cmd.args(["-show_entries", "format=duration"]);
        cmd.args(["-of", "json"]);
        cmd.arg(audio.to_string_lossy().as_ref());

        let output = self.run_checked(FFPROBE, &cmd)?;
        let duration = parse_duration_report(&output.stdout)?;
        tracing::info!("{} lasts {:.3}s", audio.display(), duration.as_secs_f64());

        Ok(duration)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DurationReport {
    format: Option<ReportFormat>,
}

#[derive(Debug, Deserialize)]
struct ReportFormat {
    duration: Option<DurationField>,
}

/// ffprobe prints numbers as strings; accept plain numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationField {
    Text(String),
    Number(f64),
}

/// Extract `format.duration` from an ffprobe JSON report.
///
/// A missing field, unparseable number, or negative value is
/// [`Error::MalformedOutput`]; no default is substituted.
pub fn parse_duration_report(json: &str) -> Result<Duration> {
    let report: DurationReport = serde_json::from_str(json)
        .map_err(|e| Error::malformed(FFPROBE, format!("invalid JSON: {e}")))?;

    let field = report
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| Error::malformed(FFPROBE, "duration not found in report"))?;

    let secs = match field {
        DurationField::Number(n) => n,
        DurationField::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::malformed(FFPROBE, format!("unparseable duration '{s}'")))?,
    };

    Duration::try_from_secs_f64(secs)
        .map_err(|_| Error::malformed(FFPROBE, format!("invalid duration {secs}")))
}
