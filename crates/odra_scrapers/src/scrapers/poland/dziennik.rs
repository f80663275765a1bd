use odra_core::{ArticleRecord, Result, UNKNOWN_TIMESTAMP};
use regex::Regex;
use scraper::Html;

use crate::config::{SelectorMap, SourceConfig, DEFAULT_LINK_CAP};
use crate::date::{self, DateFormat, DatePolicy, Locale};
use crate::scrapers::{utils, PageSelectors, SourceAdapter};

const BASE_URL: &str = "https://www.dziennik.pl/";

/// Dziennik.PL prints dates as `15 stycznia 2021` and has no byline on agency copy.
pub fn default_config() -> Result<SourceConfig> {
    Ok(SourceConfig {
        slug: "dziennik".to_string(),
        source_name: "Dziennik.PL".to_string(),
        homepage: BASE_URL.to_string(),
        link_pattern: Regex::new(r"(?i)https://\w+.dziennik.pl/\w+/artykuly/\d+")?,
        link_scope: None,
        topic_pattern: Regex::new(r".*dziennik.pl/(\w+)/artykuly/\d+")?,
        selectors: SelectorMap {
            headline: "h1.mainTitle".to_string(),
            subtitle: "#lead".to_string(),
            body_container: "div#detail".to_string(),
            body_blocks: "p, h1, h2, h3, h4, h5, h6".to_string(),
            author: "div.authDesc.authDesc1 > a > span".to_string(),
            date: "time.datePublished".to_string(),
        },
        author_fallback: "UNKNOWN".to_string(),
        date_locale: Locale::Polish,
        date_format: DateFormat::DayMonthNameYear,
        date_policy: DatePolicy::Strict,
        link_cap: DEFAULT_LINK_CAP,
    })
}

#[derive(Debug, Clone)]
pub struct DziennikAdapter {
    config: SourceConfig,
    selectors: PageSelectors,
}

impl DziennikAdapter {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let selectors = PageSelectors::compile(&config.selectors)?;
        Ok(Self { config, selectors })
    }

    /// A present but unreadable date fails the article under the strict policy.
    fn creation_date(&self, document: &Html) -> Result<i64> {
        match utils::first_text(document, &self.selectors.date) {
            Some(raw) => date::normalize_with_policy(
                &raw,
                &self.config.date_format,
                self.config.date_locale,
                self.config.date_policy,
            ),
            None => Ok(UNKNOWN_TIMESTAMP),
        }
    }
}

impl SourceAdapter for DziennikAdapter {
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
