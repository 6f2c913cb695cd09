//! Error types for the telemetry core.
//!
//! Two families only: [`ValidationError`] for rejected submissions and
//! [`StoreError`] for persistence faults. Derived views (projection, alerting,
//! windowing) are total and have no error type.

use thiserror::Error;

/// One violated validation rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("deviceId must be a non-empty string of at most 50 characters")]
    InvalidDeviceId,

    #[error("timestamp must be a valid ISO-8601 date-time")]
    InvalidTimestamp,

    #[error("nitrogen must be a number between 0 and 1000 ppm")]
    NitrogenOutOfRange,

    #[error("phosphorus must be a number between 0 and 500 ppm")]
    PhosphorusOutOfRange,

    #[error("ph must be a number between 0 and 14")]
    PhOutOfRange,
}

impl Violation {
    // ---
    /// Stable machine-readable code for this violation.
    pub fn code(&self) -> &'static str {
        match self {
            Violation::MissingField(_) => "missing-field",
            Violation::InvalidDeviceId => "invalid-device-id",
            Violation::InvalidTimestamp => "invalid-timestamp",
            Violation::NitrogenOutOfRange => "nitrogen-out-of-range",
            Violation::PhosphorusOutOfRange => "phosphorus-out-of-range",
            Violation::PhOutOfRange => "ph-out-of-range",
        }
    }
}

/// A rejected reading with every violated rule, in field order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("reading rejected with {} violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    // ---
    pub fn codes(&self) -> Vec<&'static str> {
        self.violations.iter().map(Violation::code).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Persistence failure. Never retried inside the core.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {source}")]
    Unavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    // ---
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "storage-unavailable",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable {
            source: Box::new(e),
        }
    }
}
