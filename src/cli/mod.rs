//! CLI adapter for furqan
//!
//! Provides a command-line interface for seeding the corpus and for
//! running searches and completions without the HTTP server. This
//! module is parallel to `http/`: both depend on `core/` but not on
//! each other.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              |  (domain logic)  |
//!              +--------+---------+
//!                       |
//!          +------------+------------+
//!          |                         |
//!          v                         v
//! +------------------+      +------------------+
//! |      http/       |      |      cli/        |
//! | (axum adapter)   |      | (clap adapter)   |
//! +------------------+      +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// Furqan - scripture corpus search
///
/// Seed the corpus from its dataset, then search verses with weighted
/// matching or boolean query strings and complete verse prefixes.
#[derive(Parser, Debug)]
#[command(name = "furqan")]
#[command(version)]
#[command(about = "Read-only scripture corpus search", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest the verse dataset and write the corpus snapshot
    Seed(commands::SeedArgs),

    /// Search verses
    Search(commands::SearchArgs),

    /// Complete a verse or chapter-name prefix
    Suggest(commands::SuggestArgs),

    /// Show version, storage and corpus information
    Info(commands::InfoArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  furqan completions bash > ~/.local/share/bash-completion/completions/furqan
    ///   zsh:   furqan completions zsh > ~/.zfunc/_furqan
    ///   fish:  furqan completions fish > ~/.config/fish/completions/furqan.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::xdg::XdgDirs;

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.ensure_dirs_exist()?;

    let config = Config::load()?;

    match cli.command {
        Commands::Seed(args) => commands::seed::execute(args, config, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, config, cli.format).await,
        Commands::Suggest(args) => commands::suggest::execute(args, config, cli.format).await,
        Commands::Info(args) => commands::info::execute(args, &config, &xdg, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
