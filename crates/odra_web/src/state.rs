use odra_scrapers::PipelineRegistry;

pub struct AppState {
    pub registry: PipelineRegistry,
}

impl AppState {
    pub fn new(registry: PipelineRegistry) -> Self {
        Self { registry }
    }
}
