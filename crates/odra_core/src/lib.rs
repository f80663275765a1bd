pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use storage::ArticleSink;
pub use types::{ArticleFailure, ArticleRecord, BatchOutcome, UNKNOWN_TIMESTAMP};
