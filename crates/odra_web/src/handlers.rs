use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub status: &'static str,
    pub message: String,
}

impl ErrorPayload {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorPayload::new(message))).into_response()
}

/// Runs the pipeline named by the request path and returns its records.
///
/// The run happens in its own task so a client hanging up does not cut
/// retrieval short.
pub async fn dispatch(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let path = uri.path();
    let Some(pipeline) = state.registry.for_path(path) else {
        warn!(%path, "No pipeline for path");
        return error_response(StatusCode::NOT_FOUND, format!("wrong url {}", path));
    };

    info!(source = pipeline.slug(), "Pipeline requested");
    match tokio::spawn(async move { pipeline.run().await }).await {
        Ok(Ok(outcome)) => Json(outcome.records).into_response(),
        Ok(Err(e)) => {
            error!(%path, error = %e, "Pipeline failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            error!(%path, error = %e, "Pipeline task panicked");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "pipeline aborted")
        }
    }
}
