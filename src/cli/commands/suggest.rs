//! Suggest command - complete verse or chapter-name prefixes

use crate::cli::output::{colors, format_reference, print_json};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::search::SuggestField;
use crate::core::services::Services;
use clap::{Args, ValueEnum};

/// Completion field
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    /// Diacritic-free verse text
    CleanText,
    /// Diacritic-free chapter name
    Chapter,
}

impl From<FieldArg> for SuggestField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::CleanText => SuggestField::CleanText,
            FieldArg::Chapter => SuggestField::Chapter,
        }
    }
}

/// Arguments for the suggest command
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Prefix to complete
    pub prefix: String,

    /// Field to complete against
    #[arg(long, short = 'f', value_enum, default_value = "clean-text")]
    pub field: FieldArg,
}

/// Execute the suggest command
pub async fn execute(
    args: SuggestArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Services::load(config)?;
    services.build_index()?;

    let key = format!("{}__completion", SuggestField::from(args.field).name());
    let response = services.suggest(&[(key.clone(), args.prefix.clone())])?;

    match format {
        OutputFormat::Human => {
            let options = response
                .get(&key)
                .and_then(|entries| entries.first())
                .map(|entry| entry.options.as_slice())
                .unwrap_or_default();
            if options.is_empty() {
                println!("No completions for '{}'", colors::label(&args.prefix));
            }
            for option in options {
                println!(
                    "{} {}",
                    colors::reference(&format_reference(
                        option.source.chapter.number,
                        option.source.number
                    )),
                    option.text
                );
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
