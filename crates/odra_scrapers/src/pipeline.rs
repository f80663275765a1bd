use std::sync::Arc;

use odra_core::{ArticleRecord, ArticleSink, BatchOutcome, Result};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};
use url::Url;

use crate::batch::BatchRetriever;
use crate::config::PipelineOptions;
use crate::fetcher::PageFetcher;
use crate::links::{discover_links, LinkRule};
use crate::scrapers::SourceAdapter;

/// Discovery, retrieval and extraction for one source.
pub struct Pipeline {
    adapter: Arc<dyn SourceAdapter>,
    fetcher: Arc<dyn PageFetcher>,
    retriever: BatchRetriever,
    sink: Option<Arc<dyn ArticleSink>>,
}

impl Pipeline {
    pub fn new(adapter: Arc<dyn SourceAdapter>, fetcher: Arc<dyn PageFetcher>, options: &PipelineOptions) -> Self {
        Self {
            retriever: BatchRetriever::new(fetcher.clone(), options),
            adapter,
            fetcher,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ArticleSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn slug(&self) -> &str {
        self.adapter.slug()
    }

    pub fn source_name(&self) -> &str {
        &self.adapter.config().source_name
    }

    pub fn homepage(&self) -> &str {
        &self.adapter.config().homepage
    }

    /// Fetches the homepage and returns the article URLs to retrieve.
    pub async fn discover(&self) -> Result<Vec<String>> {
        let config = self.adapter.config();
        let markup = self.fetcher.fetch(&config.homepage).await?;
        let base = Url::parse(&config.homepage).ok();

        discover_links(
            &markup,
            &LinkRule {
                pattern: &config.link_pattern,
                scope: config.link_scope.as_deref(),
                cap: config.link_cap,
                base: base.as_ref(),
            },
        )
    }

    /// Runs the pipeline without persisting the batch.
    pub async fn collect(&self) -> Result<BatchOutcome> {
        let urls = self.discover().await?;
        info!(source = self.slug(), links = urls.len(), "Retrieving articles");
        self.retriever.run(&urls, &self.adapter).await
    }

    /// Runs the pipeline and hands the records to the sink in the background.
    #[instrument(level = "info", skip(self), fields(source = self.slug()))]
    pub async fn run(&self) -> Result<BatchOutcome> {
        let outcome = self.collect().await?;
        self.persist_detached(outcome.records.clone());
        Ok(outcome)
    }

    /// Runs the pipeline and waits until the batch is stored. Used where the
    /// process may exit right after, so a spawned write could be dropped.
    #[instrument(level = "info", skip(self), fields(source = self.slug()))]
    pub async fn run_and_persist(&self) -> Result<BatchOutcome> {
        let outcome = self.collect().await?;
        self.persist(&outcome.records).await?;
        Ok(outcome)
    }

    /// Stores `records` in the sink, if one is configured.
    pub async fn persist(&self, records: &[ArticleRecord]) -> Result<()> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        let name = self.adapter.config().batch_name();
        sink.store_batch(name, records).await?;
        info!(batch = %name, records = records.len(), "Persisted batch");
        Ok(())
    }

    /// Stores `records` without waiting for the write. Write failures are only logged.
    pub fn persist_detached(&self, records: Vec<ArticleRecord>) -> Option<JoinHandle<()>> {
        let sink = self.sink.clone()?;
        let name = self.adapter.config().batch_name().to_string();

        Some(tokio::spawn(async move {
            match sink.store_batch(&name, &records).await {
                Ok(()) => info!(batch = %name, records = records.len(), "Persisted batch"),
                Err(e) => error!(batch = %name, error = %e, "Failed to persist batch"),
            }
        }))
    }
}
