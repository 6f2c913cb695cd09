//! Views over the latest-per-device projection:
//! `GET /readings/latest`, `GET /alerts` and `GET /readings/overview`.
//!
//! All three project over the full store, not the trailing window, so a
//! device that went quiet yesterday still shows its last known state.

use axum::{extract::State, response::IntoResponse, response::Response, routing::get, Json, Router};
use serde::Serialize;
use tracing::debug;

use super::{storage_failure, AppState};
use crate::{evaluate, project, summarize, AlertEvent, FleetSummary, LatestReading};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/readings/latest", get(latest))
        .route("/readings/overview", get(overview))
        .route("/alerts", get(alerts))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LatestResponse {
    latest_readings: Vec<LatestReading>,
    count: usize,
}

#[derive(Serialize)]
struct AlertsResponse {
    alerts: Vec<AlertEvent>,
    count: usize,
}

async fn latest(State((store, _config)): State<AppState>) -> Response {
    // ---
    match store.query_all().await {
        Ok(rows) => {
            let latest = project(&rows);
            debug!(
                "GET /readings/latest - {} devices from {} readings",
                latest.len(),
                rows.len()
            );
            Json(LatestResponse {
                count: latest.len(),
                latest_readings: latest,
            })
            .into_response()
        }
        Err(e) => storage_failure("fetch latest readings", &e),
    }
}

async fn alerts(State((store, _config)): State<AppState>) -> Response {
    // ---
    match store.query_all().await {
        Ok(rows) => {
            let alerts = evaluate(&project(&rows));
            debug!("GET /alerts - {} alerts", alerts.len());
            Json(AlertsResponse {
                count: alerts.len(),
                alerts,
            })
            .into_response()
        }
        Err(e) => storage_failure("evaluate alerts", &e),
    }
}

async fn overview(State((store, _config)): State<AppState>) -> Response {
    // ---
    match store.query_all().await {
        Ok(rows) => {
            let latest = project(&rows);
            let alert_count = evaluate(&latest).len();
            let summary: FleetSummary = summarize(&latest, alert_count);
            Json(summary).into_response()
        }
        Err(e) => storage_failure("build overview", &e),
    }
}
