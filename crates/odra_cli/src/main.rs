use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use odra_scrapers::{handle_command, FailurePolicy, HttpFetcher, PipelineRegistry, ScraperArgs, ScraperCommands};
use odra_storage::{create_storage, StorageKind};
use odra_web::AppState;
use tracing::info;

mod config;
mod logging;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrapes news homepages into JSON article batches", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "ODRA_CONFIG")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Storage backend for persisted batches: json or memory
    #[arg(long)]
    storage: Option<StorageKind>,
    /// Directory the json backend writes `<source>.json` into
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Maximum number of articles retrieved per run
    #[arg(long)]
    link_cap: Option<usize>,
    /// Maximum number of article requests in flight
    #[arg(long)]
    max_in_flight: Option<usize>,
    /// Return the articles that succeeded instead of failing the whole batch
    #[arg(long)]
    isolate_failures: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve one endpoint per source (default)
    Serve,
    #[command(flatten)]
    Scraper(ScraperCommands),
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(kind) = self.storage {
            config.storage.kind = kind;
        }
        if let Some(dir) = &self.output_dir {
            config.storage.dir = dir.clone();
        }
        if let Some(link_cap) = self.link_cap {
            config.scrape.link_cap = link_cap;
        }
        if let Some(max_in_flight) = self.max_in_flight {
            config.scrape.max_in_flight = max_in_flight;
        }
        if self.isolate_failures {
            config.scrape.failure_policy = FailurePolicy::Isolate;
        }
    }
}

async fn serve(registry: PipelineRegistry, config: &AppConfig) -> Result<()> {
    let addr = config.listen_addr()?;
    let app = odra_web::create_app(AppState::new(registry));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🛰️ Listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);

    let storage = create_storage(config.storage.kind, config.storage.dir.clone());
    info!("💾 Storage initialized (using {})", config.storage.kind);

    let registry = PipelineRegistry::with_defaults(Arc::new(HttpFetcher::new()), Some(storage), &config.scrape)?;
    info!("🦗 Sources: {}", registry.slugs().join(", "));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(registry, &config).await,
        Commands::Scraper(command) => {
            handle_command(ScraperArgs { command }, &registry).await?;
            Ok(())
        }
    }
}
