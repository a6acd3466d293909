//! Content sniffing from file magic bytes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ap_core::{Error, Result};

/// MIME type reported when the content is not recognized.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Number of leading bytes inspected.
const SNIFF_LEN: u64 = 4096;

/// MPEG transport stream packet size.
const TS_PACKET: usize = 188;

const ASF_GUID: [u8; 16] = [
    0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE, 0x6C,
];

/// Detect the MIME type of a file from its content.
///
/// When the content is inconclusive the extension is consulted as a hint.
/// A decisive content match (including `text/plain`) is never overridden.
pub fn detect_mime(path: &Path) -> Result<&'static str> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::from(e)
        }
    })?;

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN).read_to_end(&mut head)?;

    let mime = detect_mime_from_bytes(&head);
    if mime == OCTET_STREAM {
        if let Some(guess) = mime_from_extension(path) {
            tracing::debug!("content of {} inconclusive; extension suggests {guess}", path.display());
            return Ok(guess);
        }
    }

    Ok(mime)
}

/// Detect a MIME type from the leading bytes of a file.
pub fn detect_mime_from_bytes(head: &[u8]) -> &'static str {
    if head.is_empty() {
        return OCTET_STREAM;
    }

    if head.starts_with(b"ID3") {
        return "audio/mpeg";
    }
    if head.starts_with(b"fLaC") {
        return "audio/flac";
    }
    if head.starts_with(b"#!AMR") {
        return "audio/amr";
    }
    if head.starts_with(b"MThd") {
        return "audio/midi";
    }
    if head.starts_with(b"OggS") {
        // Theora identification header marks an Ogg video.
        return if contains(head, b"\x80theora") {
            "video/ogg"
        } else {
            "audio/ogg"
        };
    }
    if head.starts_with(b"FLV\x01") {
        return "video/x-flv";
    }
    if head.starts_with(&ASF_GUID) {
        return "video/x-ms-asf";
    }

    if head.len() >= 12 {
        match (&head[0..4], &head[8..12]) {
            (b"RIFF", b"WAVE") => return "audio/wav",
            (b"RIFF", b"AVI ") => return "video/x-msvideo",
            (b"FORM", b"AIFF") | (b"FORM", b"AIFC") => return "audio/aiff",
            _ => {}
        }

        // ISO base media file format: ftyp box at offset 4.
        if &head[4..8] == b"ftyp" {
            return map_ftyp_brand(&head[8..12]);
        }
    }

    if head.len() >= 8 {
        // Some QuickTime/MP4 files start with a box other than ftyp.
        if matches!(&head[4..8], b"moov" | b"mdat" | b"free" | b"wide") {
            return "video/mp4";
        }
    }

    // Matroska/WebM (EBML header)
    if head.starts_with(&[0x1A, 0x45, 0xDF, 0xA3]) {
        return if contains(head, b"webm") {
            "video/webm"
        } else {
            "video/x-matroska"
        };
    }

    // MPEG program stream pack header or video sequence header.
    if head.starts_with(&[0x00, 0x00, 0x01, 0xBA]) || head.starts_with(&[0x00, 0x00, 0x01, 0xB3]) {
        return "video/mpeg";
    }

    // The remaining checks match on a byte or two; text must not reach them.
    if looks_like_text(head) {
        return "text/plain";
    }

    // MPEG transport stream: sync byte repeated at packet stride.
    if head[0] == 0x47 && head.len() > TS_PACKET && head[TS_PACKET] == 0x47 {
        if head.len() <= 2 * TS_PACKET || head[2 * TS_PACKET] == 0x47 {
            return "video/mp2t";
        }
    }

    if head.len() >= 3 && head[0] == 0xFF {
        // ADTS: 12-bit sync, layer bits 00.
        if head[1] & 0xF6 == 0xF0 {
            return "audio/aac";
        }
        // MPEG audio frame: 11-bit sync, layer not reserved, bitrate index not 1111.
        let layer = (head[1] >> 1) & 0x03;
        if head[1] & 0xE0 == 0xE0 && layer != 0 && head[2] >> 4 != 0x0F {
            return "audio/mpeg";
        }
    }

    OCTET_STREAM
}

/// Guess a MIME type from the file extension.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "m4b" => "audio/mp4",
        "aac" => "audio/aac",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "amr" => "audio/amr",
        "aif" | "aiff" => "audio/aiff",
        "wma" => "audio/x-ms-wma",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "flv" => "video/x-flv",
        "mpg" | "mpeg" => "video/mpeg",
        "ts" | "m2ts" => "video/mp2t",
        "wmv" => "video/x-ms-wmv",
        "3gp" => "video/3gpp",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

fn map_ftyp_brand(brand: &[u8]) -> &'static str {
    match brand {
        b"M4A " | b"M4B " | b"M4P " | b"F4A " | b"F4B " => "audio/mp4",
        b"qt  " => "video/quicktime",
        b if b.starts_with(b"3g2") => "video/3gpp2",
        b if b.starts_with(b"3gp") => "video/3gpp",
        _ => "video/mp4",
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// UTF-8 without control characters other than common whitespace.
fn looks_like_text(head: &[u8]) -> bool {
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        // A multi-byte sequence cut off by the sniff window is still text.
        Err(e) if e.error_len().is_none() => match std::str::from_utf8(&head[..e.valid_up_to()]) {
            Ok(text) => text,
            Err(_) => return false,
        },
        Err(_) => return false,
    };

    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r' | '\x0c' | '\x1b'))
}
