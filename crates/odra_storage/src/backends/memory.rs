use std::collections::HashMap;

use async_trait::async_trait;
use odra_core::{ArticleRecord, ArticleSink, Error, Result};
use tokio::sync::RwLock;

/// Keeps the latest batch per name in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    batches: RwLock<HashMap<String, Vec<ArticleRecord>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleSink for MemoryStorage {
    async fn store_batch(&self, name: &str, records: &[ArticleRecord]) -> Result<()> {
        self.batches.write().await.insert(name.to_string(), records.to_vec());
        Ok(())
    }

    async fn load_batch(&self, name: &str) -> Result<Vec<ArticleRecord>> {
        self.batches
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("No batch stored under {}", name)))
    }
}
