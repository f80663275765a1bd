use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::date::{DateFormat, DatePolicy, Locale};

pub const DEFAULT_LINK_CAP: usize = 20;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// CSS selectors for the fields of an article page.
#[derive(Debug, Clone)]
pub struct SelectorMap {
    pub headline: String,
    pub subtitle: String,
    /// Element holding the article body.
    pub body_container: String,
    /// Blocks inside the container that make up the body text.
    pub body_blocks: String,
    pub author: String,
    pub date: String,
}

/// Markup and date conventions of one news source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Short name used in routes, CLI arguments and file names.
    pub slug: String,
    pub source_name: String,
    pub homepage: String,
    pub link_pattern: Regex,
    /// Restricts link discovery to the first element matching this selector.
    pub link_scope: Option<String>,
    /// Pattern whose first capture group is the article topic.
    pub topic_pattern: Regex,
    pub selectors: SelectorMap,
    pub author_fallback: String,
    pub date_locale: Locale,
    pub date_format: DateFormat,
    pub date_policy: DatePolicy,
    pub link_cap: usize,
}

impl SourceConfig {
    pub fn with_link_cap(mut self, link_cap: usize) -> Self {
        self.link_cap = link_cap;
        self
    }

    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = homepage.into();
        self
    }

    /// File stem the batch is persisted under.
    pub fn batch_name(&self) -> &str {
        &self.slug
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// One failed article fails the whole batch.
    #[default]
    Abort,
    /// Failed articles are reported next to the records that succeeded.
    Isolate,
}

/// Knobs shared by every pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub link_cap: usize,
    pub max_in_flight: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            link_cap: DEFAULT_LINK_CAP,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            failure_policy: FailurePolicy::Abort,
        }
    }
}
