//! CLI end-to-end tests
//!
//! Tests for the audioprep command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the audioprep binary
#[allow(deprecated)]
fn audioprep_cmd() -> Command {
    Command::cargo_bin("audioprep").unwrap()
}

fn ffmpeg_available() -> bool {
    ["ffmpeg", "ffprobe"].iter().all(|tool| {
        Command::new(tool)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    })
}

/// Render a sine tone with ffmpeg's lavfi source.
fn synth_tone(dir: &Path, name: &str, seconds: u32) -> PathBuf {
    let path = dir.join(name);
    let status = Command::new("ffmpeg")
        .args(["-v", "error", "-y", "-f", "lavfi", "-i"])
        .arg(format!("sine=frequency=440:duration={seconds}"))
        .args(["-acodec", "libmp3lame", "-b:a", "128k"])
        .arg(&path)
        .status()
        .unwrap();
    assert!(status.success());
    path
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = audioprep_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = audioprep_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("audioprep"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = audioprep_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("audioprep"));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = audioprep_cmd();
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("ffmpeg").and(predicate::str::contains("ffprobe")),
    );
}

#[test]
fn test_cli_split_help() {
    let mut cmd = audioprep_cmd();
    cmd.args(["split", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-size"));
}

#[test]
fn test_cli_split_rejects_bad_size() {
    let mut cmd = audioprep_cmd();
    cmd.args(["split", "a.mp3", "--max-size", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid size"));
}

#[test]
fn test_cli_validate_nonexistent_file() {
    let mut cmd = audioprep_cmd();
    cmd.args(["validate", "/nonexistent/path/talk.mp3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_validate_audio_file() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("memo.bin");
    let mut bytes = b"ID3\x04\x00\x00\x00\x00\x00\x00".to_vec();
    bytes.resize(256, 0);
    fs::write(&file, bytes).unwrap();

    let mut cmd = audioprep_cmd();
    cmd.args(["validate", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("audio"));
}

#[test]
fn test_cli_validate_rejects_text() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("notes.mp3");
    fs::write(&file, "these are plain notes, not audio\n").unwrap();

    let mut cmd = audioprep_cmd();
    cmd.args(["validate", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid file type text/plain"));
}

#[test]
fn test_cli_rejects_zero_budget_config() {
    let temp = tempdir().unwrap();
    let config_file = temp.path().join("audioprep.toml");
    fs::write(&config_file, "[split]\nmax_part_size = 0\n").unwrap();

    let mut cmd = audioprep_cmd();
    cmd.args([
        "--config",
        config_file.to_str().unwrap(),
        "split",
        "/nonexistent/talk.mp3",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("max_part_size"));
}

#[test]
fn test_cli_prepare_splits_real_audio() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let temp = tempdir().unwrap();
    let tone = synth_tone(temp.path(), "tone.mp3", 20);
    let size = fs::metadata(&tone).unwrap().len();
    let budget = size / 2 + 1;

    let mut cmd = audioprep_cmd();
    cmd.args([
        "prepare",
        tone.to_str().unwrap(),
        "--max-size",
        &budget.to_string(),
        "--json",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("tone-part2.mp3"));

    assert!(temp.path().join("tone-part1.mp3").exists());
    assert!(temp.path().join("tone-part2.mp3").exists());
    assert!(!temp.path().join("tone-part3.mp3").exists());
}

#[test]
fn test_cli_probe_json() {
    if !ffmpeg_available() {
        eprintln!("Skipping: ffmpeg/ffprobe not installed");
        return;
    }

    let temp = tempdir().unwrap();
    let tone = synth_tone(temp.path(), "tone.mp3", 3);

    let mut cmd = audioprep_cmd();
    cmd.args(["probe", "--json", tone.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"audio\""))
        .stdout(predicate::str::contains("\"duration\""));
}
