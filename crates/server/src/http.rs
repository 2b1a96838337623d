//! HTTP Endpoints
//!
//! REST API for the support agent.

use axum::{
    body::Bytes,
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use support_agent_agent::{SessionHistory, TurnResult};

use crate::metrics::{metrics_handler, record_escalation, record_session_cleared, record_turn};
use crate::state::AppState;

const FALLBACK_CORS_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let timeout = Duration::from_secs(config.server.timeout_seconds);
    drop(config); // Release lock before building router

    Router::new()
        // Dialogue endpoints
        .route("/chat", post(chat))
        .route("/history/:session_id", get(history))
        .route("/clear/:session_id", get(clear_session))
        .route("/api/sessions", post(create_session))
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Admin endpoints
        .route("/admin/reload-catalog", post(reload_catalog))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", FALLBACK_CORS_ORIGIN);
        return CorsLayer::new()
            .allow_origin(HeaderValue::from_static(FALLBACK_CORS_ORIGIN))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Chat request; every field is optional
#[derive(Debug, Default)]
struct ChatRequest {
    message: String,
    session_id: String,
}

impl ChatRequest {
    /// Read each field on its own; a missing or mistyped field is empty
    fn parse(body: &[u8]) -> Self {
        let value: serde_json::Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable chat request, treating as empty");
                return Self::default();
            },
        };

        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            message: field("message"),
            session_id: field("session_id"),
        }
    }
}

/// Chat endpoint
async fn chat(State(state): State<AppState>, body: Bytes) -> Json<TurnResult> {
    let request = ChatRequest::parse(&body);

    let started = Instant::now();
    let result = state.agent.process_turn(&request.session_id, &request.message);
    record_turn(&result.intent, result.sentiment, started.elapsed());
    if result.is_escalation() {
        record_escalation();
    }

    Json(result)
}

/// Session history
async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionHistory> {
    Json(state.agent.history(&session_id))
}

/// Clear session; succeeds whether or not it existed
async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<serde_json::Value> {
    if state.agent.clear(&session_id) {
        record_session_cleared();
    }
    Json(serde_json::json!({ "status": "cleared" }))
}

/// Mint a fresh session id
async fn create_session() -> (StatusCode, Json<serde_json::Value>) {
    let session_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(session_id = %session_id, "Issued session id");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": session_id })),
    )
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let catalog = state.agent.catalog();
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "intents": catalog.len(),
        "sessions": state.agent.session_count(),
    }))
}

/// Catalog reload endpoint
///
/// POST /admin/reload-catalog
///
/// Re-reads the catalog file named in the settings. A catalog that fails to
/// load leaves the running one untouched.
async fn reload_catalog(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload_catalog() {
        Ok(intents) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "intents": intents,
            })),
        ),
        Err(e) => {
            tracing::error!("Catalog reload failed: {}", e);
            let message = e.to_string();
            (
                StatusCode::from(e),
                Json(serde_json::json!({
                    "status": "error",
                    "message": message,
                })),
            )
        },
    }
}
