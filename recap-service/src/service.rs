use axum::{
    Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    middleware::{Next, from_fn},
    response::{Json, Response},
    routing::{get, post},
};
use recap_flow::{ErrorKind, RecapConfig, RecapError, RecapWorkflow};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::models::{RecapRequest, RecapResponse};

pub const CORRELATION_HEADER: &str = "x-correlation-id";

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn error_body(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// Map a pipeline failure to its response status.
fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ClientInput | ErrorKind::Upstream => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Configuration | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn recap_error(err: &RecapError) -> ApiError {
    let status = status_for(err.kind());
    if status.is_server_error() {
        error!(error = %err, "Recap request failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "Recap request rejected");
    }
    error_body(status, &err.to_string())
}

#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<RecapWorkflow>,
}

impl AppState {
    pub fn new(workflow: RecapWorkflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }
}

pub fn create_app(config: &RecapConfig) -> Router {
    build_router(AppState::new(RecapWorkflow::from_config(config)))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/recap", post(create_recap))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(correlation_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}

/// Tag every request with a correlation id and run it inside a span carrying it.
///
/// A well-formed id supplied by the caller is reused; the id is echoed on the response.
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let header = HeaderValue::from_str(&correlation_id).ok();
    if let Some(value) = &header {
        request.headers_mut().insert(CORRELATION_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "TV Recap Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Spoiler-free recaps of TV episodes from a free-text request",
        "endpoints": {
            "POST /recap": "Generate a recap, body {\"query\": \"I'm on season 3 episode 5 of Game of Thrones\"}",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn create_recap(
    State(state): State<AppState>,
    payload: Result<Json<RecapRequest>, JsonRejection>,
) -> ApiResult<RecapResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Unreadable recap request body");
        error_body(StatusCode::BAD_REQUEST, &rejection.body_text())
    })?;

    let query = request.query_text();
    info!(query = %query, "Recap requested");

    let result = state.workflow.run(query).await.map_err(|e| recap_error(&e))?;

    info!(
        show = %result.show.name,
        episodes = result.episodes.len(),
        "Recap generated"
    );
    Ok(Json(RecapResponse::from(result)))
}
