pub mod batch;
pub mod cli;
pub mod config;
pub mod date;
pub mod fetcher;
pub mod links;
pub mod manager;
pub mod pipeline;
pub mod scrapers;

pub use batch::BatchRetriever;
pub use cli::{handle_command, ScraperArgs, ScraperCommands};
pub use config::{FailurePolicy, PipelineOptions, SelectorMap, SourceConfig};
pub use fetcher::{HttpFetcher, PageFetcher, StaticFetcher};
pub use manager::PipelineRegistry;
pub use pipeline::Pipeline;
pub use scrapers::{SourceAdapter, SourceKind};

pub mod prelude {
    pub use super::scrapers::SourceAdapter;
    pub use odra_core::{ArticleRecord, Error, Result};
}
