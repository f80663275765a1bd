use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Timestamp used when an article carries no usable publication date.
pub const UNKNOWN_TIMESTAMP: i64 = 0;

/// One extracted article, serialized verbatim into a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleRecord {
    pub headline: String,
    /// Subtitle followed by the body blocks, newline-joined.
    pub text_body: String,
    /// Homepage of the origin site.
    pub source: String,
    pub source_name: String,
    pub author: String,
    pub topic: String,
    pub link: String,
    /// Epoch milliseconds at extraction time.
    pub crawl_date: i64,
    /// Epoch milliseconds of publication, `UNKNOWN_TIMESTAMP` when absent.
    pub creation_date: i64,
}

impl ArticleRecord {
    pub fn crawled_now() -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A single article that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFailure {
    pub link: String,
    pub error: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub records: Vec<ArticleRecord>,
    pub failures: Vec<ArticleFailure>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
