mod cli;

use audioprep::{config, processor};

use ap_av::{SystemRunner, Transcoder};
use ap_core::{MediaFile, SplitResult};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "audioprep=debug,ap_av=debug,ap_probe=debug".to_string()
        } else {
            "audioprep=info,ap_av=info,ap_probe=info".to_string()
        }
    });

    // Logs go to stderr so `--json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Validate { file } => validate_file(&file),
        Commands::Probe { file, json } => probe_file(&file, config_path, json),
        Commands::Extract { video } => extract_audio(&video, config_path),
        Commands::Split {
            file,
            max_size,
            json,
        } => split_file(&file, config_path, max_size, json),
        Commands::Prepare {
            file,
            max_size,
            json,
        } => prepare_file(&file, config_path, max_size, json),
        Commands::CheckTools => check_tools(config_path),
        Commands::Version => {
            println!("audioprep {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn transcoder(config: &config::Config) -> Result<Transcoder<SystemRunner>> {
    let runner = SystemRunner::new().context("Failed to start process runner")?;
    Ok(Transcoder::from_config(runner, config))
}

fn validate_file(file: &Path) -> Result<()> {
    let media = ap_probe::validate(file)?;
    println!("{}: {}", media.path.display(), media.kind);
    Ok(())
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tx = transcoder(&config)?;

    let media = processor::probe_file(&tx, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&media)?);
    } else {
        print_media(&media);
    }

    Ok(())
}

fn extract_audio(video: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tx = transcoder(&config)?;

    let media = ap_probe::validate(video)?;
    if media.kind != ap_core::MediaKind::Video {
        anyhow::bail!("{} is not a video file", video.display());
    }

    let audio = tx.extract_audio(&media.path)?;
    println!("{}", audio.display());
    Ok(())
}

fn split_file(
    file: &Path,
    config_path: Option<&Path>,
    max_size: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tx = transcoder(&config)?;
    let max_size = max_size.unwrap_or(config.split.max_part_size);

    let result = processor::split_file(&tx, file, max_size)?;
    print_split(&result, max_size, json)
}

fn prepare_file(
    file: &Path,
    config_path: Option<&Path>,
    max_size: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let tx = transcoder(&config)?;
    let max_size = max_size.unwrap_or(config.split.max_part_size);

    let result = processor::prepare_file(&tx, file, max_size)?;
    print_split(&result, max_size, json)
}

fn print_media(media: &MediaFile) {
    println!("File: {}", media.path.display());
    println!("Kind: {}", media.kind);
    if let Some(size) = media.size_bytes {
        println!("Size: {} bytes", size);
    }
    if let Some(duration) = media.duration {
        println!("Duration: {}", format_duration(duration));
    }
}

fn print_split(result: &SplitResult, max_size: u64, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("Source: {}", result.source.display());
    if !result.is_split() {
        println!("Within the {} byte budget; nothing to split.", max_size);
        return Ok(());
    }

    println!("Parts: {}", result.len());
    for (i, part) in result.iter().enumerate() {
        print!("  [{}] {}", i + 1, part.path.display());
        if let Some(size) = part.size_bytes {
            print!(" ({} bytes", size);
            if size > max_size {
                print!(", over budget");
            }
            print!(")");
        }
        if let Some(duration) = part.duration {
            print!(" {}", format_duration(duration));
        }
        println!();
    }

    Ok(())
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let mins = secs / 60;
    let hours = mins / 60;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        hours,
        mins % 60,
        secs % 60,
        duration.subsec_millis()
    )
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let tx = transcoder(&config)?;

    let tools = tx.tools().check_all(tx.runner());
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable extraction and splitting.");
    }

    Ok(())
}
