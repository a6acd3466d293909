//! Extract the audio track of a video via ffmpeg.

use std::path::{Path, PathBuf};

use ap_core::{Error, Result};

use crate::runner::ProcessRunner;
use crate::tools::FFMPEG;
use crate::transcoder::Transcoder;

/// `<dir>/<stem>.<extension>`: where the extracted audio of `video` goes.
pub fn audio_path_for(video: &Path, extension: &str) -> PathBuf {
    video.with_extension(extension)
}

impl<R: ProcessRunner> Transcoder<R> {
    /// Extract the audio of `video` into a compressed file next to it,
    /// overwriting any previous output, and return the new path.
    ///
    /// ffmpeg is probed with `-version` first; when that fails nothing else
    /// is spawned and [`Error::ToolUnavailable`] is returned.
    pub fn extract_audio(&self, video: &Path) -> Result<PathBuf> {
        let ffmpeg = self.ensure_available(FFMPEG)?;
        let encode = self.encode();

        let audio = audio_path_for(video, &encode.extension);
        if audio == video {
            return Err(Error::Validation(format!(
                "refusing to extract {} onto itself",
                video.display()
            )));
        }

        tracing::info!("Extracting audio from {} to {}", video.display(), audio.display());

        let mut cmd = self.command(ffmpeg);
        cmd.args(["-y", "-i"]);
        cmd.arg(video.to_string_lossy().as_ref());
        // Drop video, re-encode audio at a fixed bitrate.
        cmd.arg("-vn");
        cmd.args(["-acodec", encode.codec.as_str()]);
        cmd.args(["-b:a", encode.bitrate.as_str()]);
        cmd.arg(audio.to_string_lossy().as_ref());
        self.run_checked(FFMPEG, &cmd)?;

        Ok(audio)
    }
}
