// src/routes/health.rs
//! API health check endpoint for the telemetry backend.
//!
//! This module defines the `/health` route used by container orchestrators
//! and the dashboard's status indicator to verify that the service is running
//! and able to respond to HTTP requests. It follows the Explicit Module
//! Boundary Pattern (EMBP):
//! - Internal to this file: endpoint handler(s) and related types
//! - Exports to the gateway (`mod.rs`): a subrouter containing the `/health` route

use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    service: &'static str,
}

/// Handle `GET /health`.
///
/// Does not touch the store, so it stays green while the database is down.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        service: "Agricultural Sensor Dashboard API",
    })
}

/// Create a subrouter containing the `/health` route.
///
/// Generic over the application state so it can merge cleanly with the
/// gateway router.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
