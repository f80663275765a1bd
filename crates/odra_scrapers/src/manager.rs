use std::sync::Arc;

use odra_core::{ArticleSink, Error, Result};
use tracing::info;

use crate::config::PipelineOptions;
use crate::fetcher::PageFetcher;
use crate::pipeline::Pipeline;
use crate::scrapers::SourceKind;

/// The pipelines served by this process, keyed by source slug.
#[derive(Default, Clone)]
pub struct PipelineRegistry {
    pipelines: Vec<Arc<Pipeline>>,
}

impl PipelineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One pipeline per known source, all sharing `fetcher` and `sink`.
    pub fn with_defaults(
        fetcher: Arc<dyn PageFetcher>,
        sink: Option<Arc<dyn ArticleSink>>,
        options: &PipelineOptions,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for kind in SourceKind::ALL {
            let config = kind.default_config()?.with_link_cap(options.link_cap);
            let mut pipeline = Pipeline::new(kind.adapter(config)?, fetcher.clone(), options);
            if let Some(sink) = &sink {
                pipeline = pipeline.with_sink(sink.clone());
            }
            registry.register(pipeline);
        }
        info!(sources = ?registry.slugs(), "Pipelines initialized");
        Ok(registry)
    }

    /// Adds a pipeline, replacing any registered under the same slug.
    pub fn register(&mut self, pipeline: Pipeline) {
        self.pipelines.retain(|p| p.slug() != pipeline.slug());
        self.pipelines.push(Arc::new(pipeline));
    }

    pub fn get(&self, slug: &str) -> Option<Arc<Pipeline>> {
        self.pipelines.iter().find(|p| p.slug() == slug).cloned()
    }

    /// Looks up the pipeline for a request path such as `/dziennik`.
    pub fn for_path(&self, path: &str) -> Option<Arc<Pipeline>> {
        path.strip_prefix('/').and_then(|slug| self.get(slug))
    }

    pub fn require(&self, slug: &str) -> Result<Arc<Pipeline>> {
        self.get(slug).ok_or_else(|| Error::UnknownSource(slug.to_string()))
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.pipelines.iter().map(|p| p.slug()).collect()
    }

    pub fn pipelines(&self) -> impl Iterator<Item = &Arc<Pipeline>> {
        self.pipelines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticFetcher;

    fn registry() -> PipelineRegistry {
        let options = PipelineOptions {
            link_cap: 5,
            ..PipelineOptions::default()
        };
        PipelineRegistry::with_defaults(Arc::new(StaticFetcher::new()), None, &options).unwrap()
    }

    #[test]
    fn test_registers_every_source() {
        assert_eq!(registry().slugs(), vec!["dziennik", "kontext"]);
    }

    #[test]
    fn test_for_path() {
        let registry = registry();
        assert_eq!(registry.for_path("/dziennik").unwrap().source_name(), "Dziennik.PL");
        assert_eq!(registry.for_path("/kontext").unwrap().slug(), "kontext");
        assert!(registry.for_path("/").is_none());
        assert!(registry.for_path("/kontext/extra").is_none());
        assert!(registry.for_path("dziennik").is_none());
    }

    #[test]
    fn test_require_unknown_source() {
        assert!(matches!(registry().require("clarin"), Err(Error::UnknownSource(_))));
    }

    #[test]
    fn test_register_replaces_same_slug() {
        let mut registry = registry();
        let kind = SourceKind::Dziennik;
        let config = kind.default_config().unwrap().with_homepage("https://mirror.test/");
        let pipeline = Pipeline::new(
            kind.adapter(config).unwrap(),
            Arc::new(StaticFetcher::new()),
            &PipelineOptions::default(),
        );
        registry.register(pipeline);

        assert_eq!(registry.slugs().len(), 2);
        assert_eq!(registry.get("dziennik").unwrap().homepage(), "https://mirror.test/");
    }
}
