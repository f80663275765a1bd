use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

/// Every path is routed through the dispatcher, whatever the method.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .fallback(handlers::dispatch)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::AppState;
    pub use odra_core::{ArticleRecord, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use odra_core::{ArticleRecord, ArticleSink};
    use odra_scrapers::{PipelineOptions, PipelineRegistry, StaticFetcher};
    use odra_storage::MemoryStorage;
    use serde_json::Value;
    use tower::ServiceExt;

    const HOMEPAGE: &str = "https://www.dziennik.pl/";
    const ARTICLE: &str = "https://wiadomosci.dziennik.pl/kraj/artykuly/100,tytul.html";

    fn app(fetcher: StaticFetcher, sink: Arc<dyn ArticleSink>) -> Router {
        let registry =
            PipelineRegistry::with_defaults(Arc::new(fetcher), Some(sink), &PipelineOptions::default()).unwrap();
        create_app(AppState::new(registry))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_path_returns_error_payload() {
        let (status, content_type, body) =
            get(app(StaticFetcher::new(), Arc::new(MemoryStorage::new())), "/clarin").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "wrong url /clarin");
    }

    #[tokio::test]
    async fn test_known_path_returns_records() {
        let fetcher = StaticFetcher::new()
            .with_page(HOMEPAGE, format!(r#"<a href="{}">x</a>"#, ARTICLE))
            .with_page(ARTICLE, r#"<h1 class="mainTitle">Tytuł</h1>"#);
        let sink = Arc::new(MemoryStorage::new());

        let (status, content_type, body) = get(app(fetcher, sink.clone()), "/dziennik").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let records: Vec<ArticleRecord> = serde_json::from_value(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].headline, "Tytuł");
        assert_eq!(records[0].topic, "kraj");
        assert_eq!(records[0].author, "UNKNOWN");
    }

    #[tokio::test]
    async fn test_pipeline_failure_returns_bad_gateway() {
        let (status, _, body) =
            get(app(StaticFetcher::new(), Arc::new(MemoryStorage::new())), "/kontext").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("kontextwochenzeitung"));
    }
}
