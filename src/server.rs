use crate::{ExtractError, ExtractionService};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExtractionService>,
}

#[derive(serde::Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let envelope = ErrorEnvelope {
        success: false,
        error: message.to_string(),
    };
    (status, Json(envelope)).into_response()
}

/// Failure status policy: input problems are the client's fault, a slow
/// origin is a timeout, everything else is a server-side fetch failure.
/// Failures always use a non-200 status.
fn status_for(error: &ExtractError) -> StatusCode {
    match error {
        ExtractError::InvalidUrl(_) | ExtractError::UnsupportedScheme(_) => {
            StatusCode::BAD_REQUEST
        }
        ExtractError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
        ExtractError::FetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn extract_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return error_response(StatusCode::BAD_REQUEST, "Request body must be valid JSON");
    };

    let Some(url) = body.get("url").and_then(Value::as_str) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Request body must contain a string \"url\" field",
        );
    };

    debug!(url = %url, "Handling extraction request");

    match state.service.try_extract(url).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            e.log();
            error_response(status_for(&e), &e.to_string())
        }
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Build the HTTP surface: a single POST route plus health check. The CORS
/// layer answers pre-flight OPTIONS probes with an empty 200 before the
/// handler is ever reached; this endpoint exists precisely so that browser
/// clients on other origins can reach third-party HTML through it.
pub fn build_router(service: ExtractionService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let state = AppState {
        service: Arc::new(service),
    };

    Router::new()
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
