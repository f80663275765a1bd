use odra_core::{ArticleRecord, Error, Result, UNKNOWN_TIMESTAMP};
use regex::Regex;
use scraper::Html;
use tracing::warn;

use crate::config::{SelectorMap, SourceConfig, DEFAULT_LINK_CAP};
use crate::date::{self, DateFormat, DatePolicy, Locale};
use crate::scrapers::{utils, PageSelectors, SourceAdapter};

const BASE_URL: &str = "https://www.kontextwochenzeitung.de/";

/// KONTEXT prints dates as `Datum: 15.01.2021`; only the news list on the
/// homepage links to articles.
pub fn default_config() -> Result<SourceConfig> {
    let article_pattern = Regex::new(r"(?i)https://www.kontextwochenzeitung.de/(\w+)/.*.html")?;
    Ok(SourceConfig {
        slug: "kontext".to_string(),
        source_name: "KONTEXT: Wochenzeitung".to_string(),
        homepage: BASE_URL.to_string(),
        link_pattern: article_pattern.clone(),
        link_scope: Some(".news-list-view".to_string()),
        topic_pattern: article_pattern,
        selectors: SelectorMap {
            headline: "div.header h1".to_string(),
            subtitle: "div.teaser-text".to_string(),
            body_container: "div.bodytext.margin-singlebodytext".to_string(),
            body_blocks: "p, h1, h2, h3, h4, h5, h6".to_string(),
            author: ".document-info .author".to_string(),
            date: ".document-info .datum".to_string(),
        },
        author_fallback: String::new(),
        date_locale: Locale::German,
        date_format: DateFormat::Pattern("%d.%m.%Y".to_string()),
        date_policy: DatePolicy::Lenient,
        link_cap: DEFAULT_LINK_CAP,
    })
}

#[derive(Debug, Clone)]
pub struct KontextAdapter {
    config: SourceConfig,
    selectors: PageSelectors,
}

impl KontextAdapter {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let selectors = PageSelectors::compile(&config.selectors)?;
        Ok(Self { config, selectors })
    }

    /// The date sits between the label's colon and the next one, possibly
    /// followed by a time or other text. Anything unreadable degrades to
    /// unknown under the lenient policy.
    fn creation_date(&self, document: &Html) -> Result<i64> {
        let Some(raw) = utils::first_text(document, &self.selectors.date) else {
            return Ok(UNKNOWN_TIMESTAMP);
        };

        let labelled = raw
            .split(':')
            .nth(1)
            .map(|value| value.trim().to_string())
            .ok_or_else(|| Error::date_parse(raw.as_str(), "missing label separator"));

        match labelled {
            Ok(value) => date::normalize_with_policy(
                &value,
                &self.config.date_format,
                self.config.date_locale,
                self.config.date_policy,
            ),
            Err(e) if self.config.date_policy == DatePolicy::Lenient => {
                warn!(raw = %raw, error = %e, "Falling back to unknown creation date");
                Ok(UNKNOWN_TIMESTAMP)
            }
            Err(e) => Err(e),
        }
    }
}

impl SourceAdapter for KontextAdapter {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    fn extract(&self, markup: &str, url: &str) -> Result<ArticleRecord> {
        let topic = utils::extract_topic(&self.config.topic_pattern, url)?;
        let document = Html::parse_document(markup);

        let headline = utils::first_text(&document, &self.selectors.headline).unwrap_or_default();
        let subtitle = utils::first_text(&document, &self.selectors.subtitle).unwrap_or_default();
        let blocks = utils::block_texts(
            &document,
            &self.selectors.body_container,
            &self.selectors.body_blocks,
        );
        let author = utils::first_text(&document, &self.selectors.author)
            .unwrap_or_else(|| self.config.author_fallback.clone());

        Ok(ArticleRecord {
            headline,
            text_body: utils::compose_body(&subtitle, &blocks),
            source: self.config.homepage.clone(),
            source_name: self.config.source_name.clone(),
            author,
            topic,
            link: url.to_string(),
            crawl_date: ArticleRecord::crawled_now(),
            creation_date: self.creation_date(&document)?,
        })
    }
}
