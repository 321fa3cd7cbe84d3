//! Info command - show version, storage and corpus information

use crate::cli::output::{colors, format_bytes, format_relative_time, print_json};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::corpus::{Census, CorpusSnapshot};
use crate::core::search::SCHEMA_VERSION;
use crate::core::xdg::XdgDirs;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Read the snapshot and report corpus counts
    #[arg(long, short = 'd')]
    pub detailed: bool,
}

/// Snapshot details
#[derive(Debug, Serialize)]
pub struct SnapshotInfo {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub census: Option<Census>,
}

/// Information response
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub index_schema_version: u32,
    pub config_file: String,
    pub snapshot: SnapshotInfo,
}

/// Execute the info command
pub async fn execute(
    args: InfoArgs,
    config: &Config,
    xdg: &XdgDirs,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.storage.snapshot_path();
    let exists = path.exists();
    let size_bytes = exists
        .then(|| std::fs::metadata(&path).map(|m| m.len()))
        .transpose()?;

    let (written_at, census) = if args.detailed && exists {
        let snapshot = CorpusSnapshot::read(&path)?;
        let written_at = snapshot.written_at;
        (Some(written_at), Some(snapshot.into_store()?.census()))
    } else {
        (None, None)
    };

    let info = InfoResponse {
        name: "furqan".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        index_schema_version: SCHEMA_VERSION,
        config_file: xdg.config_file().display().to_string(),
        snapshot: SnapshotInfo {
            path: path.display().to_string(),
            exists,
            size_bytes,
            written_at,
            census,
        },
    };

    match format {
        OutputFormat::Human => {
            println!("furqan {}", info.version);
            println!("Index schema: v{}", info.index_schema_version);
            println!("Config: {}", colors::file_path(&info.config_file));
            match info.snapshot.size_bytes {
                Some(size) => println!(
                    "Snapshot: {} ({})",
                    colors::file_path(&info.snapshot.path),
                    format_bytes(size)
                ),
                None => println!(
                    "Snapshot: {} {}",
                    colors::file_path(&info.snapshot.path),
                    colors::warning("(missing, run `furqan seed`)")
                ),
            }
            if let Some(written_at) = &info.snapshot.written_at {
                println!("Written: {}", colors::dim(&format_relative_time(written_at)));
            }
            if let Some(census) = &info.snapshot.census {
                println!(
                    "Corpus: {} parts, {} chapters, {} verses",
                    colors::number(&census.parts.to_string()),
                    colors::number(&census.chapters.to_string()),
                    colors::number(&census.verses.to_string())
                );
            }
        }
        OutputFormat::Json => print_json(&info)?,
    }

    Ok(())
}
