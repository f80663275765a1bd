use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use odra_core::{ArticleRecord, Error, Result};
use scraper::{Html, Selector};

use crate::config::{SelectorMap, SourceConfig};

pub mod germany;
pub mod poland;

use germany::KontextAdapter;
use poland::DziennikAdapter;

/// Turns the markup of one article page into a record.
pub trait SourceAdapter: Send + Sync {
    /// Returns the markup and date conventions of this source
    fn config(&self) -> &SourceConfig;

    /// Extracts a record from the article at `url`
    fn extract(&self, markup: &str, url: &str) -> Result<ArticleRecord>;

    fn slug(&self) -> &str {
        &self.config().slug
    }
}

/// Every source this crate knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Dziennik,
    Kontext,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Dziennik, SourceKind::Kontext];

    pub fn slug(&self) -> &'static str {
        match self {
            SourceKind::Dziennik => "dziennik",
            SourceKind::Kontext => "kontext",
        }
    }

    pub fn default_config(&self) -> Result<SourceConfig> {
        match self {
            SourceKind::Dziennik => poland::dziennik::default_config(),
            SourceKind::Kontext => germany::kontext::default_config(),
        }
    }

    pub fn adapter(&self, config: SourceConfig) -> Result<Arc<dyn SourceAdapter>> {
        Ok(match self {
            SourceKind::Dziennik => Arc::new(DziennikAdapter::new(config)?),
            SourceKind::Kontext => Arc::new(KontextAdapter::new(config)?),
        })
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let slug = s.trim().trim_matches('/').to_lowercase();
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == slug)
            .ok_or_else(|| Error::UnknownSource(s.to_string()))
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Compiled form of a [`SelectorMap`].
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub headline: Selector,
    pub subtitle: Selector,
    pub body_container: Selector,
    pub body_blocks: Selector,
    pub author: Selector,
    pub date: Selector,
}

impl PageSelectors {
    pub fn compile(map: &SelectorMap) -> Result<Self> {
        Ok(Self {
            headline: utils::parse_selector(&map.headline)?,
            subtitle: utils::parse_selector(&map.subtitle)?,
            body_container: utils::parse_selector(&map.body_container)?,
            body_blocks: utils::parse_selector(&map.body_blocks)?,
            author: utils::parse_selector(&map.author)?,
            date: utils::parse_selector(&map.date)?,
        })
    }
}

/// Common utilities for adapters
pub(crate) mod utils {
    use super::*;
    use regex::Regex;

    pub fn parse_selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector).map_err(|e| Error::Selector(format!("{}: {}", selector, e)))
    }

    /// Trimmed text of the first element matching `selector`.
    pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
        document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
    }

    /// Trimmed, non-empty texts of the `blocks` inside the first `container`.
    pub fn block_texts(document: &Html, container: &Selector, blocks: &Selector) -> Vec<String> {
        document
            .select(container)
            .next()
            .map(|container| {
                container
                    .select(blocks)
                    .map(|el| el.text().collect::<String>().trim().to_string())
                    .filter(|text| !text.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn compose_body(subtitle: &str, blocks: &[String]) -> String {
        format!("{}\n{}", subtitle, blocks.join("\n")).trim().to_string()
    }

    pub fn extract_topic(pattern: &Regex, url: &str) -> Result<String> {
        pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|topic| topic.as_str().to_string())
            .filter(|topic| !topic.is_empty())
            .ok_or_else(|| Error::TopicExtraction(url.to_string()))
    }
}
