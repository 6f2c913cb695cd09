//! Fleet overview over the latest-per-device set.

use serde::Serialize;

use crate::alerts::{is_high_nitrogen, is_ph_out_of_range};
use crate::models::LatestReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Normal,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total_devices: usize,
    /// `None` when there are no devices.
    pub average_nitrogen: Option<f64>,
    pub average_phosphorus: Option<f64>,
    pub average_ph: Option<f64>,
    pub nitrogen_status: MetricStatus,
    pub ph_status: MetricStatus,
    pub alert_count: usize,
}

// ---

/// Summarize the latest readings. Averages use the same thresholds as the
/// alert rules to pick a status.
pub fn summarize(latest: &[LatestReading], alert_count: usize) -> FleetSummary {
    // ---
    let mean = |f: fn(&LatestReading) -> f64| -> Option<f64> {
        if latest.is_empty() {
            None
        } else {
            Some(latest.iter().map(f).sum::<f64>() / latest.len() as f64)
        }
    };

    let average_nitrogen = mean(|r| r.nitrogen);
    let average_phosphorus = mean(|r| r.phosphorus);
    let average_ph = mean(|r| r.ph);

    let status = |warn: bool| {
        if warn {
            MetricStatus::Warning
        } else {
            MetricStatus::Normal
        }
    };

    FleetSummary {
        total_devices: latest.len(),
        nitrogen_status: status(average_nitrogen.is_some_and(is_high_nitrogen)),
        ph_status: status(average_ph.is_some_and(is_ph_out_of_range)),
        average_nitrogen,
        average_phosphorus,
        average_ph,
        alert_count,
    }
}
