use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audioprep")]
#[command(author, version, about = "Prepare audio and video files for size-limited uploads")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that a file exists and is audio or video
    Validate {
        /// File to validate
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Measure a media file's duration and size
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract the audio track of a video next to it
    Extract {
        /// Video file
        #[arg(required = true)]
        video: PathBuf,
    },

    /// Split a media file into parts under a size budget
    Split {
        /// File to split
        #[arg(required = true)]
        file: PathBuf,

        /// Maximum part size, e.g. 25MiB or 24MB (defaults to config)
        #[arg(short, long, value_parser = parse_size)]
        max_size: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate, extract audio from video, and split for upload
    Prepare {
        /// Audio or video file
        #[arg(required = true)]
        file: PathBuf,

        /// Maximum part size, e.g. 25MiB or 24MB (defaults to config)
        #[arg(short, long, value_parser = parse_size)]
        max_size: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Display version information
    Version,
}

/// Parse a byte size such as `1048576`, `500K`, `24MB`, or `25MiB`.
///
/// Single-letter and `i` suffixes are binary (1024-based); `KB`, `MB`,
/// and `GB` are decimal.
pub fn parse_size(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("size cannot be empty".to_string());
    }

    let split_at = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split_at);

    if digits.is_empty() {
        return Err(format!("invalid size '{value}'"));
    }

    let number: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size '{value}'"))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kib" => 1 << 10,
        "kb" => 1_000,
        "m" | "mib" => 1 << 20,
        "mb" => 1_000_000,
        "g" | "gib" => 1 << 30,
        "gb" => 1_000_000_000,
        other => return Err(format!("invalid size unit '{other}' in '{value}'")),
    };

    let bytes = number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("size '{value}' is too large"))?;

    if bytes == 0 {
        return Err("size must be greater than zero".to_string());
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plain_bytes() {
        assert_eq!(parse_size("1048576").unwrap(), 1_048_576);
        assert_eq!(parse_size(" 512B ").unwrap(), 512);
    }

    #[test]
    fn parses_binary_and_decimal_units() {
        assert_eq!(parse_size("25MiB").unwrap(), 25 * 1024 * 1024);
        assert_eq!(parse_size("25M").unwrap(), 25 * 1024 * 1024);
        assert_eq!(parse_size("24MB").unwrap(), 24_000_000);
        assert_eq!(parse_size("500k").unwrap(), 512_000);
        assert_eq!(parse_size("500KB").unwrap(), 500_000);
        assert_eq!(parse_size("1GiB").unwrap(), 1 << 30);
        assert_eq!(parse_size("2gb").unwrap(), 2_000_000_000);
        assert_eq!(parse_size("10 MB").unwrap(), 10_000_000);
    }

    #[test]
    fn rejects_bad_sizes() {
        for bad in ["", "MB", "0", "0MB", "1.5MB", "12XB", "-5"] {
            assert!(parse_size(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(parse_size("99999999999999999999").is_err());
        assert!(parse_size("18446744073709551615G").is_err());
    }

    #[test]
    fn split_accepts_max_size() {
        let cli = Cli::try_parse_from(["audioprep", "split", "a.mp3", "--max-size", "10MB"]).unwrap();
        match cli.command {
            Commands::Split { max_size, json, .. } => {
                assert_eq!(max_size, Some(10_000_000));
                assert!(!json);
            }
            _ => panic!("expected split"),
        }
    }
}
