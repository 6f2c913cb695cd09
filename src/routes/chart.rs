//! `GET /readings/chart` – nitrogen trend frame over the readings window.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{storage_failure, AppState};
use crate::{build_frame, DeviceFilter, TimeSeriesFrame, NITROGEN_ALERT_PPM};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/readings/chart", get(handler))
}

/// Query parameters for the chart frame
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    /// Device id, or `all` (default).
    device: Option<String>,
    /// Defaults to `CHART_MAX_POINTS`.
    max_points: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartResponse {
    #[serde(flatten)]
    frame: TimeSeriesFrame,
    data_points: usize,
    active_devices: usize,
    alert_threshold: f64,
}

async fn handler(
    Query(params): Query<ChartQuery>,
    State((store, config)): State<AppState>,
) -> Response {
    // ---
    debug!("GET /readings/chart - {:?}", params);

    let filter = DeviceFilter::parse(params.device.as_deref());
    let max_points = params.max_points.unwrap_or(config.chart_max_points);

    match store.query_window(Utc::now(), config.window_hours).await {
        Ok(readings) => {
            let frame = build_frame(&readings, &filter, max_points);
            Json(ChartResponse {
                data_points: frame.rows.len(),
                active_devices: frame.devices.len(),
                alert_threshold: NITROGEN_ALERT_PPM,
                frame,
            })
            .into_response()
        }
        Err(e) => storage_failure("build chart", &e),
    }
}
