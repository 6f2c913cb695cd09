//! Routes gateway (EMBP).
//!
//! Each sibling module exports a subrouter; this module merges them, attaches
//! the shared state and the HTTP layers, and is the only thing `main.rs`
//! needs to know about.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{Config, SharedStore, StoreError};

mod chart;
mod health;
mod latest;
mod readings;

/// Router state: the injected store capability plus configuration.
pub type AppState = (SharedStore, Config);

// ---

pub fn router(store: SharedStore, config: Config) -> Router {
    // ---
    Router::new()
        .merge(readings::router())
        .merge(latest::router())
        .merge(chart::router())
        .merge(health::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state((store, config))
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
        .into_response()
}

/// 500 response for a failed store call. `what` completes "Failed to ...".
fn storage_failure(what: &str, err: &StoreError) -> Response {
    // ---
    tracing::error!("Failed to {}: {}", what, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": format!("Failed to {what}"),
            "code": err.code(),
        })),
    )
        .into_response()
}
