//! Re-encode a time window of a file via ffmpeg.

use std::path::Path;
use std::time::Duration;

use ap_core::Result;

use crate::runner::ProcessRunner;
use crate::tools::FFMPEG;
use crate::transcoder::Transcoder;

/// Seconds with millisecond precision, as passed to `-ss` / `-t`.
pub fn format_seconds(d: Duration) -> String {
    format!("{:.3}", d.as_secs_f64())
}

impl<R: ProcessRunner> Transcoder<R> {
    /// Re-encode `length` of `source` starting at `start` into `output`,
    /// overwriting it.
    pub fn cut_segment(
        &self,
        source: &Path,
        output: &Path,
        start: Duration,
        length: Duration,
    ) -> Result<()> {
        let ffmpeg = self.require(FFMPEG)?;
        let encode = self.encode();

        tracing::debug!(
            "cut {} [{}s +{}s] -> {}",
            source.display(),
            format_seconds(start),
            format_seconds(length),
            output.display()
        );

        let mut cmd = self.command(ffmpeg);
        cmd.args(["-y", "-i"]);
        cmd.arg(source.to_string_lossy().as_ref());
        cmd.arg("-ss").arg(format_seconds(start));
        cmd.arg("-t").arg(format_seconds(length));
        cmd.arg("-vn");
        cmd.args(["-acodec", encode.codec.as_str()]);
        cmd.args(["-b:a", encode.bitrate.as_str()]);
        cmd.arg(output.to_string_lossy().as_ref());
        self.run_checked(FFMPEG, &cmd)?;

        Ok(())
    }
}
