use std::path::{Path, PathBuf};

use async_trait::async_trait;
use odra_core::{ArticleRecord, ArticleSink, Result};
use tokio::fs;
use tracing::{debug, instrument};

/// Writes each batch to `<dir>/<name>.json`, overwriting the previous run.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl ArticleSink for JsonFileStorage {
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    async fn store_batch(&self, name: &str, records: &[ArticleRecord]) -> Result<()> {
        let json = serde_json::to_vec(records)?;
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(name);
        fs::write(&path, json).await?;
        debug!(path = %path.display(), "Wrote batch");
        Ok(())
    }

    async fn load_batch(&self, name: &str) -> Result<Vec<ArticleRecord>> {
        let bytes = fs::read(self.path_for(name)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
