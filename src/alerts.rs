//! Threshold alerting over a set of readings.
//!
//! Stateless: every call derives alerts from scratch. Callers that need
//! "new since last poll" semantics track that themselves.

use serde::Serialize;

use crate::models::StoredReading;

/// Nitrogen above this (ppm) raises [`AlertKind::HighNitrogen`]. Exclusive.
pub const NITROGEN_ALERT_PPM: f64 = 200.0;
/// Acceptable pH band, inclusive on both ends.
pub const PH_BAND: (f64, f64) = (6.0, 7.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    HighNitrogen,
    PhOutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub device_id: String,
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
}

// ---

/// Evaluate every reading against the static rules.
///
/// Output follows input order; within one reading the nitrogen rule is
/// checked before the pH rule.
pub fn evaluate(readings: &[StoredReading]) -> Vec<AlertEvent> {
    // ---
    let mut alerts = Vec::new();

    for r in readings {
        if is_high_nitrogen(r.nitrogen) {
            alerts.push(AlertEvent {
                device_id: r.device_id.clone(),
                kind: AlertKind::HighNitrogen,
                message: format!(
                    "High nitrogen level detected on {}: {} ppm",
                    r.device_id, r.nitrogen
                ),
                severity: Severity::Warning,
            });
        }

        if is_ph_out_of_range(r.ph) {
            alerts.push(AlertEvent {
                device_id: r.device_id.clone(),
                kind: AlertKind::PhOutOfRange,
                message: format!(
                    "pH out of range on {}: {} (should be 6.0–7.0)",
                    r.device_id, r.ph
                ),
                severity: Severity::Warning,
            });
        }
    }

    alerts
}

pub fn is_high_nitrogen(nitrogen: f64) -> bool {
    nitrogen > NITROGEN_ALERT_PPM
}

pub fn is_ph_out_of_range(ph: f64) -> bool {
    ph < PH_BAND.0 || ph > PH_BAND.1
}
