use async_trait::async_trait;
use crate::types::ArticleRecord;
use crate::Result;

#[async_trait]
pub trait ArticleSink: Send + Sync {
    /// Persist a batch under the given name, replacing any previous one
    async fn store_batch(&self, name: &str, records: &[ArticleRecord]) -> Result<()>;

    /// Read back the last batch stored under the given name
    async fn load_batch(&self, name: &str) -> Result<Vec<ArticleRecord>>;
}
