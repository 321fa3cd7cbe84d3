//! Seed command - ingest the dataset and write the corpus snapshot

use crate::cli::output::{colors, format_duration, print_json, print_warning};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::corpus::{seed_store, CorpusSnapshot, Dataset};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Verse records (JSON array); defaults to corpus.verses_file
    #[arg(long)]
    pub verses: Option<PathBuf>,

    /// Chapter name mapping; defaults to corpus.chapter_names_file
    #[arg(long)]
    pub chapter_names: Option<PathBuf>,

    /// Worded part labels; defaults to corpus.part_names_file
    #[arg(long)]
    pub part_names: Option<PathBuf>,

    /// Replace an existing snapshot
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Accept a dataset that is not the complete 30/114/6236 corpus
    #[arg(long)]
    pub allow_partial: bool,
}

/// Seeding result
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub snapshot: String,
    pub parts: usize,
    pub chapters: usize,
    pub verses: usize,
    pub duration_secs: f64,
}

/// Execute the seed command
pub async fn execute(
    args: SeedArgs,
    mut config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = args.verses {
        config.corpus.verses_file = Some(path);
    }
    if let Some(path) = args.chapter_names {
        config.corpus.chapter_names_file = Some(path);
    }
    if let Some(path) = args.part_names {
        config.corpus.part_names_file = Some(path);
    }

    let snapshot_path = config.storage.snapshot_path();
    if snapshot_path.exists() && !args.force {
        return Err(format!(
            "Snapshot '{}' already exists. Use --force to re-seed.",
            snapshot_path.display()
        )
        .into());
    }

    let start = Instant::now();
    let dataset = Dataset::from_config(&config.corpus)?;
    let require_complete = config.corpus.require_complete && !args.allow_partial;
    let store = seed_store(dataset, require_complete)?;
    CorpusSnapshot::from_store(&store).write(&snapshot_path)?;

    let census = store.census();
    let response = SeedResponse {
        snapshot: snapshot_path.display().to_string(),
        parts: census.parts,
        chapters: census.chapters,
        verses: census.verses,
        duration_secs: start.elapsed().as_secs_f64(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "Seeded {} parts, {} chapters, {} verses in {}",
                colors::number(&response.parts.to_string()),
                colors::number(&response.chapters.to_string()),
                colors::number(&response.verses.to_string()),
                format_duration(response.duration_secs)
            );
            println!("Snapshot: {}", colors::file_path(&response.snapshot));
            if !require_complete {
                print_warning("corpus completeness was not checked");
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
