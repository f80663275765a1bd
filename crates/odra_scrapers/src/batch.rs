use std::sync::Arc;

use futures::stream::{self, StreamExt};
use odra_core::{ArticleFailure, ArticleRecord, BatchOutcome, Result};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{FailurePolicy, PipelineOptions};
use crate::fetcher::PageFetcher;
use crate::scrapers::SourceAdapter;

/// Fetches and extracts a list of article URLs with a bounded number of
/// requests in flight.
#[derive(Clone)]
pub struct BatchRetriever {
    fetcher: Arc<dyn PageFetcher>,
    max_in_flight: usize,
    failure_policy: FailurePolicy,
}

impl BatchRetriever {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: &PipelineOptions) -> Self {
        Self {
            fetcher,
            max_in_flight: options.max_in_flight.max(1),
            failure_policy: options.failure_policy,
        }
    }

    /// Records come back in the order of `urls`, whatever order the fetches
    /// complete in.
    #[instrument(level = "info", skip_all, fields(source = adapter.slug(), urls = urls.len()))]
    pub async fn run(&self, urls: &[String], adapter: &Arc<dyn SourceAdapter>) -> Result<BatchOutcome> {
        let mut records: Vec<Option<ArticleRecord>> = vec![None; urls.len()];
        let mut failures: Vec<(usize, ArticleFailure)> = Vec::new();

        let mut results = stream::iter(urls.iter().cloned().enumerate())
            .map(|(index, url)| {
                let fetcher = self.fetcher.clone();
                let adapter = adapter.clone();
                async move {
                    let result = retrieve(fetcher.as_ref(), adapter.as_ref(), &url).await;
                    (index, result)
                }
            })
            .buffer_unordered(self.max_in_flight);

        while let Some((index, result)) = results.next().await {
            let url = &urls[index];
            match result {
                Ok(record) => {
                    debug!(%url, "Extracted article");
                    records[index] = Some(record);
                }
                Err(e) if self.failure_policy == FailurePolicy::Abort => {
                    error!(%url, error = %e, "Article failed, aborting batch");
                    return Err(e);
                }
                Err(e) => {
                    warn!(%url, error = %e, "Article failed, skipping");
                    failures.push((
                        index,
                        ArticleFailure {
                            link: url.clone(),
                            error: e.to_string(),
                        },
                    ));
                }
            }
        }

        failures.sort_by_key(|(index, _)| *index);
        let outcome = BatchOutcome {
            records: records.into_iter().flatten().collect(),
            failures: failures.into_iter().map(|(_, failure)| failure).collect(),
        };

        info!(
            records = outcome.records.len(),
            failures = outcome.failures.len(),
            "Batch retrieved"
        );
        Ok(outcome)
    }
}

async fn retrieve(fetcher: &dyn PageFetcher, adapter: &dyn SourceAdapter, url: &str) -> Result<ArticleRecord> {
    let markup = fetcher.fetch(url).await?;
    adapter.extract(&markup, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SelectorMap, SourceConfig};
    use crate::date::{DateFormat, DatePolicy, Locale};
    use crate::scrapers::SourceKind;
    use async_trait::async_trait;
    use odra_core::Error;
    use regex::Regex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn synthetic_config() -> SourceConfig {
        SourceConfig {
            slug: "test".to_string(),
            source_name: "Test".to_string(),
            homepage: "https://n.test/".to_string(),
            link_pattern: Regex::new(r"https://n\.test/\w+/\d+").unwrap(),
            link_scope: None,
            topic_pattern: Regex::new(r"https://n\.test/(\w+)/\d+").unwrap(),
            selectors: SelectorMap {
                headline: "h1".to_string(),
                subtitle: ".lead".to_string(),
                body_container: "article".to_string(),
                body_blocks: "p".to_string(),
                author: ".author".to_string(),
                date: "time".to_string(),
            },
            author_fallback: String::new(),
            date_locale: Locale::German,
            date_format: DateFormat::Pattern("%d.%m.%Y".to_string()),
            date_policy: DatePolicy::Lenient,
            link_cap: 20,
        }
    }

    fn adapter() -> Arc<dyn SourceAdapter> {
        SourceKind::Kontext.adapter(synthetic_config()).unwrap()
    }

    /// Answers later URLs first and tracks how many requests overlap.
    struct SlowFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        fail: Option<String>,
    }

    impl SlowFetcher {
        fn new(fail: Option<&str>) -> Self {
            Self {
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                fail: fail.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for SlowFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let id: u64 = url.rsplit('/').next().and_then(|id| id.parse().ok()).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(id * 4))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail.as_deref() == Some(url) {
                return Err(Error::fetch(url, "status 500 Internal Server Error"));
            }
            Ok(format!("<h1>Article {}</h1>", id))
        }
    }

    fn urls(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("https://n.test/news/{}", i)).collect()
    }

    #[tokio::test]
    async fn test_results_follow_input_order() {
        let fetcher = Arc::new(SlowFetcher::new(None));
        let options = PipelineOptions {
            max_in_flight: 4,
            ..PipelineOptions::default()
        };
        let retriever = BatchRetriever::new(fetcher.clone(), &options);
        let urls = urls(10);

        let outcome = retriever.run(&urls, &adapter()).await.unwrap();

        let links: Vec<_> = outcome.records.iter().map(|r| r.link.clone()).collect();
        assert_eq!(links, urls);
        assert_eq!(outcome.records[3].headline, "Article 3");
        assert!(outcome.is_complete());
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_abort_policy_fails_batch() {
        let fetcher = Arc::new(SlowFetcher::new(Some("https://n.test/news/2")));
        let retriever = BatchRetriever::new(fetcher, &PipelineOptions::default());

        let err = retriever.run(&urls(5), &adapter()).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_isolate_policy_returns_partial_batch() {
        let fetcher = Arc::new(SlowFetcher::new(Some("https://n.test/news/2")));
        let options = PipelineOptions {
            failure_policy: FailurePolicy::Isolate,
            ..PipelineOptions::default()
        };
        let retriever = BatchRetriever::new(fetcher, &options);

        let outcome = retriever.run(&urls(5), &adapter()).await.unwrap();
        assert_eq!(outcome.records.len(), 4);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].link, "https://n.test/news/2");
        assert!(outcome.records.iter().all(|r| r.link != "https://n.test/news/2"));
    }

    #[tokio::test]
    async fn test_topic_error_counts_as_failure() {
        let fetcher = Arc::new(SlowFetcher::new(None));
        let retriever = BatchRetriever::new(fetcher, &PipelineOptions::default());
        let urls = vec!["https://n.test/0".to_string()];

        let err = retriever.run(&urls, &adapter()).await.unwrap_err();
        assert!(matches!(err, Error::TopicExtraction(_)));
    }
}
