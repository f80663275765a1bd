use clap::{Args, Subcommand};
use odra_core::Result;
use tracing::warn;

use crate::manager::PipelineRegistry;

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    #[command(subcommand)]
    pub command: ScraperCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Run one source's pipeline and print the batch as JSON
    Scrape {
        /// The source to scrape (e.g. dziennik)
        source: String,
        /// Only print the discovered article links
        #[arg(long)]
        links_only: bool,
    },
    /// List available sources
    List,
}

pub async fn handle_command(args: ScraperArgs, registry: &PipelineRegistry) -> Result<()> {
    match args.command {
        ScraperCommands::Scrape { source, links_only } => {
            let pipeline = registry.require(&source)?;

            if links_only {
                for url in pipeline.discover().await? {
                    println!("{}", url);
                }
                return Ok(());
            }

            let outcome = pipeline.run_and_persist().await?;
            for failure in &outcome.failures {
                warn!(link = %failure.link, error = %failure.error, "Article skipped");
            }
            println!("{}", serde_json::to_string_pretty(&outcome.records)?);
        }
        ScraperCommands::List => {
            println!("Available sources:");
            for pipeline in registry.pipelines() {
                println!("  {:<10} {} ({})", pipeline.slug(), pipeline.source_name(), pipeline.homepage());
            }
        }
    }
    Ok(())
}
