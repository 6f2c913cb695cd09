//! Nutrient/pH sensor telemetry: ingestion, latest-per-device projection,
//! threshold alerting and trend-chart windowing.
//!
//! Module layout (EMBP): each module owns one concern and exposes a narrow
//! surface that is re-exported here, so sibling modules and the binary only
//! ever import from the crate root.
//! - `validator` – candidate → [`Reading`] or every violated rule
//! - `store` – append-only [`ReadingStore`] (PostgreSQL or in-memory)
//! - `projector` – newest reading per device
//! - `alerts` – static threshold rules
//! - `windower` – sparse multi-device time-series frames
//! - `summary` – fleet averages over the latest set
//! - `routes` – axum gateway over all of the above

mod alerts;
mod config;
mod error;
mod models;
mod projector;
mod routes;
mod schema;
mod store;
mod summary;
mod validator;
mod windower;

pub use alerts::{evaluate, AlertEvent, AlertKind, Severity, NITROGEN_ALERT_PPM, PH_BAND};
pub use config::{load_from_env, Config, StoreBackend};
pub use error::{StoreError, ValidationError, Violation};
pub use models::{LatestReading, Reading, ReadingCandidate, StoredReading};
pub use projector::project;
pub use routes::{router, AppState};
pub use schema::create_schema;
pub use store::{MemoryReadingStore, PgReadingStore, ReadingStore, SharedStore};
pub use summary::{summarize, FleetSummary, MetricStatus};
pub use validator::validate;
pub use windower::{build_frame, DeviceFilter, FrameRow, TimeSeriesFrame, DEFAULT_MAX_POINTS};
