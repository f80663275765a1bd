use std::collections::HashSet;

use odra_core::{Error, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

/// Rules for picking article links out of a homepage.
#[derive(Debug, Clone)]
pub struct LinkRule<'a> {
    pub pattern: &'a Regex,
    pub scope: Option<&'a str>,
    pub cap: usize,
    /// Base used to resolve relative hrefs.
    pub base: Option<&'a Url>,
}

/// Returns the unique article URLs of `markup` in document order, at most `rule.cap` of them.
pub fn discover_links(markup: &str, rule: &LinkRule<'_>) -> Result<Vec<String>> {
    let document = Html::parse_document(markup);
    let anchors = Selector::parse("a[href]")
        .map_err(|e| Error::Selector(format!("a[href]: {}", e)))?;

    let root = match rule.scope {
        Some(scope) => {
            let scope_selector = Selector::parse(scope)
                .map_err(|e| Error::Selector(format!("{}: {}", scope, e)))?;
            match document.select(&scope_selector).next() {
                Some(element) => element,
                None => {
                    debug!(scope, "Link scope not present in homepage");
                    return Ok(Vec::new());
                }
            }
        }
        None => document.root_element(),
    };

    let mut seen = HashSet::new();
    let links: Vec<String> = root
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve(href, rule.base))
        .filter(|url| rule.pattern.is_match(url))
        .filter(|url| seen.insert(url.clone()))
        .take(rule.cap)
        .collect();

    debug!(count = links.len(), cap = rule.cap, "Discovered article links");
    Ok(links)
}

fn resolve(href: &str, base: Option<&Url>) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(String::from),
        None => Some(href.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule<'a>(pattern: &'a Regex, scope: Option<&'a str>, cap: usize) -> LinkRule<'a> {
        LinkRule {
            pattern,
            scope,
            cap,
            base: None,
        }
    }

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let html = r#"
            <a href="https://n.test/a/1">one</a>
            <a href="https://n.test/a/2">two</a>
            <a href="https://n.test/a/1">one again</a>
            <a href="https://n.test/about">about</a>
            <a href="https://n.test/a/3">three</a>
        "#;
        let pattern = Regex::new(r"https://n\.test/a/\d+").unwrap();
        let links = discover_links(html, &rule(&pattern, None, 20)).unwrap();
        assert_eq!(
            links,
            vec!["https://n.test/a/1", "https://n.test/a/2", "https://n.test/a/3"]
        );
    }

    #[test]
    fn test_cap_applies_after_dedup() {
        let html: String = (0..30)
            .map(|i| format!(r#"<a href="https://n.test/a/{}">x</a><a href="https://n.test/a/{}">x</a>"#, i, i))
            .collect();
        let pattern = Regex::new(r"/a/\d+").unwrap();
        let links = discover_links(&html, &rule(&pattern, None, 20)).unwrap();
        assert_eq!(links.len(), 20);
        assert_eq!(links.iter().collect::<HashSet<_>>().len(), 20);
        assert_eq!(links[19], "https://n.test/a/19");
    }

    #[test]
    fn test_scope_restricts_search() {
        let html = r#"
            <a href="https://n.test/a/0">outside</a>
            <div class="news-list-view"><a href="https://n.test/a/1">inside</a></div>
        "#;
        let pattern = Regex::new(r"/a/\d+").unwrap();
        let links = discover_links(html, &rule(&pattern, Some(".news-list-view"), 20)).unwrap();
        assert_eq!(links, vec!["https://n.test/a/1"]);

        let links = discover_links(html, &rule(&pattern, Some(".missing"), 20)).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_relative_links_resolved_against_base() {
        let html = r#"<a href="/polityka/artykuly/42">rel</a>"#;
        let pattern = Regex::new(r"https://www\.n\.test/\w+/artykuly/\d+").unwrap();
        let base = Url::parse("https://www.n.test/").unwrap();
        let links = discover_links(
            html,
            &LinkRule {
                pattern: &pattern,
                scope: None,
                cap: 20,
                base: Some(&base),
            },
        )
        .unwrap();
        assert_eq!(links, vec!["https://www.n.test/polityka/artykuly/42"]);
    }

    #[test]
    fn test_empty_markup() {
        let pattern = Regex::new(r".*").unwrap();
        assert!(discover_links("", &rule(&pattern, None, 20)).unwrap().is_empty());
    }
}
