//! Data models for the nutrient telemetry pipeline.
//!
//! A reading moves through three shapes:
//! - [`ReadingCandidate`] – the raw JSON body as submitted by a device or form
//! - [`Reading`] – a validated, normalized reading ready to be appended
//! - [`StoredReading`] – a reading as persisted, with its surrogate id and
//!   insertion time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validator::{NITROGEN_RANGE, PH_RANGE, PHOSPHORUS_RANGE};

// ---

/// Raw reading submission.
///
/// Every field is optional and loosely typed so the validator can report
/// every problem at once instead of failing on the first bad field during
/// deserialization. `null` deserializes to `None` and is treated as missing.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingCandidate {
    // ---
    pub device_id: Option<Value>,
    pub timestamp: Option<Value>,
    pub nitrogen: Option<Value>,
    pub phosphorus: Option<Value>,
    pub ph: Option<Value>,
}

/// Validated reading, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    // ---
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub ph: f64,
}

/// Reading as held by a [`ReadingStore`](crate::store::ReadingStore).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredReading {
    // ---
    /// Store-assigned surrogate key. Strictly increasing in insert order.
    pub id: i64,
    pub device_id: String,
    /// Sensor-supplied measurement time.
    #[sqlx(rename = "recorded_at")]
    pub timestamp: DateTime<Utc>,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub ph: f64,
    /// Time the row was appended to the store.
    pub created_at: DateTime<Utc>,
}

/// The newest reading for one device, as selected by
/// [`project`](crate::projector::project).
pub type LatestReading = StoredReading;

impl Reading {
    // ---
    /// Attach the store-assigned id and insertion time.
    pub fn into_stored(self, id: i64, created_at: DateTime<Utc>) -> StoredReading {
        // ---
        StoredReading {
            id,
            device_id: self.device_id,
            timestamp: self.timestamp,
            nitrogen: self.nitrogen,
            phosphorus: self.phosphorus,
            ph: self.ph,
            created_at,
        }
    }
}

impl StoredReading {
    // ---
    /// True when the row still satisfies the invariants enforced at insert
    /// time. Rows failing this check are dropped by the store on read.
    pub fn is_well_formed(&self) -> bool {
        // ---
        let id = self.device_id.trim();
        !id.is_empty()
            && id.chars().count() <= crate::validator::MAX_DEVICE_ID_LEN
            && NITROGEN_RANGE.contains(&self.nitrogen)
            && PHOSPHORUS_RANGE.contains(&self.phosphorus)
            && PH_RANGE.contains(&self.ph)
    }

    /// Ordering key used wherever two readings of one device compete:
    /// sensor time first, surrogate id as the tie-break.
    pub fn recency_key(&self) -> (DateTime<Utc>, i64) {
        (self.timestamp, self.id)
    }
}
