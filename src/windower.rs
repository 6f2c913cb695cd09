//! Time-series frames for trend charts.
//!
//! A frame is a sparse join on exact timestamps: one row per distinct
//! timestamp, one cell per device. A device with no reading at a row's exact
//! timestamp gets an empty cell. Nothing is bucketed, interpolated or carried
//! forward, so devices sampled on different cadences render as gaps.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::StoredReading;

pub const DEFAULT_MAX_POINTS: usize = 30;

/// Row label format, e.g. `Jan 1, 12:00 AM`.
const LABEL_FORMAT: &str = "%b %-d, %I:%M %p";

/// Which devices participate in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceFilter {
    #[default]
    All,
    Device(String),
}

impl DeviceFilter {
    // ---
    /// Exactly `"all"` or an empty value selects every device. The match is
    /// case-sensitive, so a device named `ALL` can still be selected.
    pub fn parse(raw: Option<&str>) -> Self {
        // ---
        match raw.map(str::trim) {
            None | Some("") | Some("all") => DeviceFilter::All,
            Some(s) => DeviceFilter::Device(s.to_string()),
        }
    }

    fn admits(&self, device_id: &str) -> bool {
        match self {
            DeviceFilter::All => true,
            DeviceFilter::Device(id) => id == device_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRow {
    /// Display label.
    pub timestamp: String,
    /// Ordering key.
    pub at: DateTime<Utc>,
    /// Nitrogen per device; `None` (JSON `null`) where the device has no
    /// reading at exactly `at`.
    pub values: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesFrame {
    /// Every device present in the filtered input, ascending.
    pub devices: Vec<String>,
    /// Oldest first.
    pub rows: Vec<FrameRow>,
}

// ---

/// Build a frame over the most recent `max_points` distinct timestamps.
pub fn build_frame(
    readings: &[StoredReading],
    filter: &DeviceFilter,
    max_points: usize,
) -> TimeSeriesFrame {
    // ---
    let mut devices: BTreeSet<&str> = BTreeSet::new();
    let mut instants: BTreeSet<DateTime<Utc>> = BTreeSet::new();
    let mut cells: HashMap<(&str, DateTime<Utc>), &StoredReading> = HashMap::new();

    for r in readings.iter().filter(|r| filter.admits(&r.device_id)) {
        devices.insert(r.device_id.as_str());
        instants.insert(r.timestamp);
        cells
            .entry((r.device_id.as_str(), r.timestamp))
            .and_modify(|current| {
                if r.id > current.id {
                    *current = r;
                }
            })
            .or_insert(r);
    }

    let skip = instants.len().saturating_sub(max_points);
    let rows: Vec<FrameRow> = instants
        .into_iter()
        .skip(skip)
        .map(|at| FrameRow {
            timestamp: format_label(at),
            at,
            values: devices
                .iter()
                .map(|&d| (d.to_string(), cells.get(&(d, at)).map(|r| r.nitrogen)))
                .collect(),
        })
        .collect();

    TimeSeriesFrame {
        devices: devices.into_iter().map(str::to_string).collect(),
        rows,
    }
}

pub fn format_label(at: DateTime<Utc>) -> String {
    at.format(LABEL_FORMAT).to_string()
}
