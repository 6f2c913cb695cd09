//! `POST /readings` and `GET /readings`.
//!
//! Ingestion runs the validator before touching the store, so a rejected
//! reading is never persisted. Listing returns the trailing window, newest
//! first.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use super::{storage_failure, AppState};
use crate::{validate, ReadingCandidate, StoredReading};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/readings", get(list).post(create))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedResponse {
    #[serde(flatten)]
    reading: StoredReading,
    message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    readings: Vec<StoredReading>,
    count: usize,
    time_range: String,
}

async fn create(
    State((store, _config)): State<AppState>,
    body: Result<Json<ReadingCandidate>, JsonRejection>,
) -> Response {
    // ---
    let Json(candidate) = match body {
        Ok(body) => body,
        Err(rejection) => {
            info!("POST /readings - Malformed body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Validation failed",
                    "details": [rejection.body_text()],
                    "codes": ["malformed-body"],
                })),
            )
                .into_response();
        }
    };

    let reading = match validate(&candidate) {
        Ok(reading) => reading,
        Err(e) => {
            info!("POST /readings - Rejected: {:?}", e.codes());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Validation failed",
                    "details": e.messages(),
                    "codes": e.codes(),
                })),
            )
                .into_response();
        }
    };

    match store.append(reading).await {
        Ok(stored) => {
            info!(id = stored.id, device_id = %stored.device_id, "POST /readings - Stored");
            (
                StatusCode::CREATED,
                Json(CreatedResponse {
                    reading: stored,
                    message: "Reading saved successfully",
                }),
            )
                .into_response()
        }
        Err(e) => storage_failure("save reading", &e),
    }
}

async fn list(State((store, config)): State<AppState>) -> Response {
    // ---
    debug!("GET /readings - window {}h", config.window_hours);

    match store.query_window(Utc::now(), config.window_hours).await {
        Ok(readings) => Json(ListResponse {
            count: readings.len(),
            readings,
            time_range: config.window_label(),
        })
        .into_response(),
        Err(e) => storage_failure("fetch readings", &e),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, SecondsFormat, Utc};
    use serde_json::json;

    use crate::routes::test_support::{app, send};

    fn body_at(device: &str, ts: &str, nitrogen: f64) -> serde_json::Value {
        json!({
            "deviceId": device,
            "timestamp": ts,
            "nitrogen": nitrogen,
            "phosphorus": 45,
            "ph": 6.5
        })
    }

    #[tokio::test]
    async fn test_create_returns_201_with_id() {
        // ---
        let (app, store) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/readings",
            Some(body_at("GH001", "2024-01-01T00:00:00Z", 250.0)),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["deviceId"], "GH001");
        assert_eq!(body["timestamp"], "2024-01-01T00:00:00Z");
        assert_eq!(body["nitrogen"], 250.0);
        assert_eq!(body["message"], "Reading saved successfully");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_with_every_violation() {
        // ---
        let (app, store) = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/readings",
            Some(json!({ "deviceId": "GH001", "nitrogen": 2000, "ph": -1 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["codes"],
            json!([
                "missing-field",
                "nitrogen-out-of-range",
                "missing-field",
                "ph-out-of-range"
            ])
        );
        assert_eq!(body["details"].as_array().unwrap().len(), 4);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_malformed_json_is_400() {
        // ---
        let (app, store) = app();
        let request = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/readings")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_returns_window_newest_first() {
        // ---
        let (app, _) = app();
        let now = Utc::now();
        let stamps = [
            now - Duration::hours(30),
            now - Duration::hours(2),
            now - Duration::minutes(5),
        ];
        for (i, ts) in stamps.iter().enumerate() {
            let ts = ts.to_rfc3339_opts(SecondsFormat::Secs, true);
            let (status, _) = send(
                &app,
                Method::POST,
                "/readings",
                Some(body_at("GH001", &ts, 100.0 + i as f64)),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, Method::GET, "/readings", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["timeRange"], "24 hours");
        assert_eq!(body["readings"][0]["nitrogen"], 102.0);
        assert_eq!(body["readings"][1]["nitrogen"], 101.0);
    }
}
