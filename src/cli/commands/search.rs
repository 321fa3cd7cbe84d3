//! Search command - search verses

use crate::cli::output::{colors, format_reference, print_json, truncate_chars};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use crate::core::pagination::{PAGE_PARAM, PAGE_SIZE_PARAM};
use crate::core::search::{ORDERING_PARAM, SEARCH_PARAM, SIMPLE_QUERY_PARAM};
use crate::core::services::Services;
use clap::Args;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Weighted match over the verse text (a phrase when several words)
    pub query: Option<String>,

    /// Boolean query string: "phrase", prefix*, -not, a + b, a | b, ( )
    #[arg(long, short = 's')]
    pub simple: Option<String>,

    /// Ordering, e.g. `-score` or `chapter,-number`
    #[arg(long, short = 'o')]
    pub ordering: Option<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(long, short = 'k', default_value = "10")]
    pub page_size: usize,

    /// Only show verse references (no text)
    #[arg(long)]
    pub references_only: bool,
}

impl SearchArgs {
    /// Query parameters equivalent to `GET /search/verses`
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        let mut push = |key: &str, value: String| params.push((key.to_string(), value));
        if let Some(query) = &self.query {
            push(SEARCH_PARAM, query.clone());
        }
        if let Some(simple) = &self.simple {
            push(SIMPLE_QUERY_PARAM, simple.clone());
        }
        if let Some(ordering) = &self.ordering {
            push(ORDERING_PARAM, ordering.clone());
        }
        push(PAGE_PARAM, self.page.to_string());
        push(PAGE_SIZE_PARAM, self.page_size.to_string());
        params
    }
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    config: Config,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let services = Services::load(config)?;
    services.build_index()?;

    let response = services.search("/search/verses", &args.params())?;

    match format {
        OutputFormat::Human => {
            if response.results.is_empty() {
                println!("No verses matched");
                return Ok(());
            }
            println!(
                "Found {} verse(s):\n",
                colors::number(&response.count.to_string())
            );
            let offset = (args.page.max(1) - 1) * args.page_size;
            for (i, hit) in response.results.iter().enumerate() {
                let doc = &hit.document;
                println!(
                    "[{}] {} {} {}",
                    colors::rank(&(offset + i + 1).to_string()),
                    colors::reference(&format_reference(doc.chapter.number, doc.number)),
                    doc.chapter.name_en,
                    colors::score(&format!("(score: {:.2})", hit.score))
                );
                if !args.references_only {
                    println!("    {}", truncate_chars(&doc.text, 120));
                    println!("    {}", colors::dim(&truncate_chars(&doc.clean_text, 120)));
                }
            }
            if response.next.is_some() {
                println!(
                    "\n{}",
                    colors::dim(&format!("More results: --page {}", args.page + 1))
                );
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
