//! Furqan CLI - command-line interface for the scripture corpus
//!
//! Seeds the corpus snapshot and runs searches and completions
//! directly, without the HTTP server.
//!
//! # Examples
//!
//! ```bash
//! # Seed the corpus from the dataset
//! furqan seed --verses hafsData_v18.json --chapter-names sora_names.json
//!
//! # Weighted search
//! furqan search الصيام
//!
//! # Boolean query string
//! furqan search --simple '"لعنة الله" -الكافرين'
//!
//! # Complete a verse prefix
//! furqan suggest يا
//! ```

use clap::Parser;
use furqan::cli::output::print_error;
use furqan::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // stdout carries command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "furqan=warn".into()),
        )
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
