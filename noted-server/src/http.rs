//! Noted HTTP REST API
//!
//! Axum-based HTTP server exposing the notes store over HTTP, plus static
//! serving of the frontend page from the configured directory.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to an
//! inner function. The inner functions are directly testable without axum
//! dispatch machinery.
//!
//! Endpoints:
//! - GET    /api/notes     — list all notes, most recent first
//! - POST   /api/notes     — create a note from `{content}`
//! - DELETE /api/notes/:id — delete a note by id
//! - GET    /health        — plain-text liveness check

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};
use noted_core::{NoteStore, NotedConfig, NotedError};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub store: NoteStore,
    pub config: NotedConfig,
}

/// Build the Axum router: the API routes plus the static frontend fallback.
pub fn build_router(state: Arc<HttpState>) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    Router::new()
        .route(
            "/api/notes",
            get(list_notes_handler).post(create_note_handler),
        )
        .route("/api/notes/:id", delete(delete_note_handler))
        .route("/health", get(health_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    store: NoteStore,
    config: NotedConfig,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(HttpState { store, config });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Noted HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct CreateNoteRequest {
    pub content: Option<String>,
}

/// Standard HTTP error response: `{"error": message}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// ============================================================================
// Inner (directly testable) business logic functions
// ============================================================================

/// Inner list — all notes as a JSON array, most recent first.
pub async fn list_notes_inner(store: &NoteStore) -> (StatusCode, serde_json::Value) {
    match store.list().await {
        Ok(notes) => match serde_json::to_value(&notes) {
            Ok(body) => (StatusCode::OK, body),
            Err(e) => storage_error(e.to_string()),
        },
        Err(e) => error_to_response(e),
    }
}

/// Inner create — validates content, inserts, returns the created note.
pub async fn create_note_inner(
    store: &NoteStore,
    req: CreateNoteRequest,
) -> (StatusCode, serde_json::Value) {
    // A missing field behaves like blank content; the store rejects it
    // before any query runs.
    let content = req.content.unwrap_or_default();
    match store.create(&content).await {
        Ok(note) => match serde_json::to_value(&note) {
            Ok(body) => (StatusCode::CREATED, body),
            Err(e) => storage_error(e.to_string()),
        },
        Err(e) => error_to_response(e),
    }
}

/// Inner delete — validates the raw path id, removes the row, reports the outcome.
pub async fn delete_note_inner(store: &NoteStore, raw_id: &str) -> (StatusCode, serde_json::Value) {
    let id = match parse_note_id(raw_id) {
        Ok(id) => id,
        Err(e) => return error_to_response(e),
    };

    match store.delete(id).await {
        Ok(true) => (StatusCode::OK, serde_json::json!({ "ok": true, "id": id })),
        Ok(false) => error_to_response(NotedError::NotFound(id)),
        Err(e) => error_to_response(e),
    }
}

/// Inner health — pure, never fails.
pub fn health_inner() -> &'static str {
    "noted server is up"
}

// ============================================================================
// Axum handler wrappers (thin — delegate to inner functions)
// ============================================================================

pub async fn list_notes_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = list_notes_inner(&state.store).await;
    (status, Json(body))
}

pub async fn create_note_handler(
    State(state): State<Arc<HttpState>>,
    Json(req): Json<CreateNoteRequest>,
) -> impl IntoResponse {
    let (status, body) = create_note_inner(&state.store, req).await;
    (status, Json(body))
}

pub async fn delete_note_handler(
    State(state): State<Arc<HttpState>>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = delete_note_inner(&state.store, &raw_id).await;
    (status, Json(body))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, health_inner())
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a note id from a raw path segment. Only unsigned decimal digits are
/// accepted, so negative or garbage ids are rejected before any query runs.
pub fn parse_note_id(raw: &str) -> Result<i64, NotedError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NotedError::Validation("invalid id".to_string()));
    }
    raw.parse::<i64>()
        .map_err(|_| NotedError::Validation("invalid id".to_string()))
}

/// Map a store error onto its HTTP status and `{"error": message}` body.
pub fn error_to_response(err: NotedError) -> (StatusCode, serde_json::Value) {
    let status = match &err {
        NotedError::Validation(_) => StatusCode::BAD_REQUEST,
        NotedError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("request failed: {}", err);
    }
    let body = serde_json::to_value(ErrorResponse::new(err.to_string()))
        .unwrap_or_else(|_| serde_json::json!({ "error": "internal error" }));
    (status, body)
}

fn storage_error(msg: String) -> (StatusCode, serde_json::Value) {
    tracing::error!("request failed: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({ "error": msg }),
    )
}

// ============================================================================
// Unit Tests — pure helpers, no DB required
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_inner_pure() {
        assert_eq!(health_inner(), "noted server is up");
    }

    #[test]
    fn test_parse_note_id_accepts_digits() {
        assert_eq!(parse_note_id("1").unwrap(), 1);
        assert_eq!(parse_note_id("42").unwrap(), 42);
        assert_eq!(parse_note_id("007").unwrap(), 7);
    }

    #[test]
    fn test_parse_note_id_rejects_non_numeric() {
        for raw in ["abc", "1a", "-1", "1.5", "", " 1", "+1"] {
            assert!(
                matches!(parse_note_id(raw), Err(NotedError::Validation(_))),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_parse_note_id_rejects_overflow() {
        // 20 digits is past i64::MAX
        assert!(parse_note_id("99999999999999999999").is_err());
    }

    #[test]
    fn test_error_to_response_validation_is_400() {
        let (status, body) = error_to_response(NotedError::Validation("content is required".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "content is required");
    }

    #[test]
    fn test_error_to_response_not_found_is_404() {
        let (status, body) = error_to_response(NotedError::NotFound(7));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("7"));
    }

    #[test]
    fn test_error_to_response_database_is_500() {
        let (status, _) = error_to_response(NotedError::Database(sqlx::Error::PoolClosed));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
