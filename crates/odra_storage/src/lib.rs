use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use odra_core::{ArticleSink, Error, Result};
use serde::{Deserialize, Serialize};

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Json,
    Memory,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(StorageKind::Json),
            "memory" => Ok(StorageKind::Memory),
            other => Err(Error::Storage(format!("Unknown storage backend: {}", other))),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Json => f.write_str("json"),
            StorageKind::Memory => f.write_str("memory"),
        }
    }
}

/// Builds the sink pipelines persist their batches to.
pub fn create_storage(kind: StorageKind, dir: impl Into<PathBuf>) -> Arc<dyn ArticleSink> {
    match kind {
        StorageKind::Json => Arc::new(JsonFileStorage::new(dir)),
        StorageKind::Memory => Arc::new(MemoryStorage::new()),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageKind};
}
