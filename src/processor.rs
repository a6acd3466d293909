//! The end-to-end flows behind the `probe`, `split`, and `prepare` commands.

use std::path::Path;

use ap_av::{ProcessRunner, Transcoder};
use ap_core::{MediaFile, MediaKind, Result, SplitResult};

/// Validate `path` and fill in its duration and size.
pub fn probe_file<R: ProcessRunner>(transcoder: &Transcoder<R>, path: &Path) -> Result<MediaFile> {
    let file = ap_probe::validate(path)?;
    let duration = transcoder.probe_duration(&file.path)?;
    file.with_duration(duration).stat_size()
}

/// Probe `path` and split it under `max_size_bytes`, without extraction.
///
/// A video is cut directly; its audio track is what ends up in the parts.
pub fn split_file<R: ProcessRunner>(
    transcoder: &Transcoder<R>,
    path: &Path,
    max_size_bytes: u64,
) -> Result<SplitResult> {
    let file = probe_file(transcoder, path)?;
    transcoder.split(&file, max_size_bytes)
}

/// Turn any audio or video file into upload-ready audio parts.
///
/// Validates the input, extracts the audio track of a video, probes the
/// audio's duration and size, then splits it under `max_size_bytes`.
pub fn prepare_file<R: ProcessRunner>(
    transcoder: &Transcoder<R>,
    path: &Path,
    max_size_bytes: u64,
) -> Result<SplitResult> {
    let file = ap_probe::validate(path)?;

    let audio = match file.kind {
        MediaKind::Video => {
            tracing::info!("Extracting audio from {}", file.path.display());
            let extracted = transcoder.extract_audio(&file.path)?;
            MediaFile::new(extracted, MediaKind::Audio)
        }
        MediaKind::Audio => file,
    };

    let duration = transcoder.probe_duration(&audio.path)?;
    let audio = audio.with_duration(duration).stat_size()?;

    let result = transcoder.split(&audio, max_size_bytes)?;
    tracing::info!(
        "Prepared {} part(s) from {}",
        result.len(),
        path.display()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_av::testing::FakeRunner;
    use ap_core::Error;
    use std::fs;
    use std::time::Duration;

    const MP4_HEAD: &[u8] = b"\x00\x00\x00\x18ftypisom\x00\x00\x02\x00isomiso2mp41";
    const MP3_HEAD: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00";

    fn media(dir: &Path, name: &str, head: &[u8], len: usize) -> std::path::PathBuf {
        let mut bytes = head.to_vec();
        bytes.resize(len.max(head.len()), 0);
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn probe_fills_duration_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = media(dir.path(), "talk.mp3", MP3_HEAD, 4_096);
        let tx = Transcoder::new(FakeRunner::media_suite(12.5, 0), FakeRunner::registry());

        let file = probe_file(&tx, &path).unwrap();
        assert_eq!(file.kind, MediaKind::Audio);
        assert_eq!(file.duration, Some(Duration::from_millis(12_500)));
        assert_eq!(file.size_bytes, Some(4_096));
    }

    #[test]
    fn prepare_small_audio_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = media(dir.path(), "memo.mp3", MP3_HEAD, 500);
        let tx = Transcoder::new(FakeRunner::media_suite(3.0, 0), FakeRunner::registry());

        let result = prepare_file(&tx, &path, 1_000).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.parts[0].path, path);
        assert!(tx.runner().calls_to("ffmpeg").is_empty());
    }

    #[test]
    fn prepare_video_extracts_then_splits_the_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = media(dir.path(), "lecture.mp4", MP4_HEAD, 64);
        // Every ffmpeg run writes 2_500 bytes: the extracted track needs
        // three 1_000 byte parts.
        let tx = Transcoder::new(FakeRunner::media_suite(90.0, 2_500), FakeRunner::registry());

        let result = prepare_file(&tx, &path, 1_000).unwrap();
        assert_eq!(result.source, dir.path().join("lecture.mp3"));
        assert_eq!(result.len(), 3);
        assert_eq!(result.parts[2].path, dir.path().join("lecture-part3.mp3"));

        let ffprobe = tx.runner().calls_to("ffprobe");
        assert_eq!(
            ffprobe.last().and_then(|c| c.args.last()).map(String::as_str),
            dir.path().join("lecture.mp3").to_str()
        );
    }

    #[test]
    fn prepare_rejects_non_media() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "just some notes\n").unwrap();
        let tx = Transcoder::new(FakeRunner::media_suite(1.0, 0), FakeRunner::registry());

        let err = prepare_file(&tx, &path, 1_000).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(tx.runner().calls().is_empty());
    }

    #[test]
    fn split_file_cuts_video_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = media(dir.path(), "clip.mp4", MP4_HEAD, 2_000);
        let tx = Transcoder::new(FakeRunner::media_suite(10.0, 900), FakeRunner::registry());

        let result = split_file(&tx, &path, 1_000).unwrap();
        assert_eq!(result.source, path);
        assert_eq!(result.len(), 2);
        assert_eq!(result.parts[0].path, dir.path().join("clip-part1.mp3"));
    }
}
