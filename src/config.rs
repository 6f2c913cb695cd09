//! Configuration loader for the `nutrient-telemetry` backend service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};

/// Parse an optional numeric environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Which [`ReadingStore`](crate::store::ReadingStore) backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => bail!("unknown store backend '{other}' (expected 'postgres' or 'memory')"),
        }
    }
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    pub store_backend: StoreBackend,

    /// PostgreSQL connection string. Set whenever the backend is Postgres.
    pub db_url: Option<String>,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// HTTP listen port.
    pub port: u16,

    /// Width of the `GET /readings` window, in hours.
    pub window_hours: u32,

    /// Default number of points in a chart frame.
    pub chart_max_points: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            db_url: None,
            db_pool_max: 5,
            port: 3001,
            window_hours: 24,
            chart_max_points: crate::windower::DEFAULT_MAX_POINTS,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `STORE_BACKEND` – `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL` – PostgreSQL connection string, **required** for postgres
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `PORT` – HTTP listen port (default: 3001)
/// - `READINGS_WINDOW_HOURS` – `GET /readings` window (default: 24)
/// - `CHART_MAX_POINTS` – default chart frame size (default: 30)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let store_backend = match env::var("STORE_BACKEND") {
        Ok(v) => v.parse()?,
        Err(_) => StoreBackend::Postgres,
    };

    let db_url = match store_backend {
        StoreBackend::Postgres => Some(require_env!("DATABASE_URL")),
        StoreBackend::Memory => env::var("DATABASE_URL").ok(),
    };

    let defaults = Config::default();
    let db_pool_max = parse_env!("DB_POOL_MAX", u32, defaults.db_pool_max);
    let port = parse_env!("PORT", u16, defaults.port);
    let window_hours = parse_env!("READINGS_WINDOW_HOURS", u32, defaults.window_hours);
    let chart_max_points = parse_env!("CHART_MAX_POINTS", usize, defaults.chart_max_points);

    if window_hours == 0 {
        bail!("READINGS_WINDOW_HOURS must be at least 1");
    }

    Ok(Config {
        store_backend,
        db_url,
        db_pool_max,
        port,
        window_hours,
        chart_max_points,
    })
}

impl Config {
    // ---
    /// Human-readable label for the readings window, e.g. `"24 hours"`.
    pub fn window_label(&self) -> String {
        match self.window_hours {
            1 => "1 hour".to_string(),
            h => format!("{h} hours"),
        }
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the database password while showing all configuration values
    /// that were loaded.
    pub fn log_config(&self) {
        // ---
        let masked_db_url = self
            .db_url
            .as_deref()
            .map(mask_password)
            .unwrap_or_else(|| "<unset>".to_string());

        tracing::info!("Configuration loaded:");
        tracing::info!("  STORE_BACKEND         : {:?}", self.store_backend);
        tracing::info!("  DATABASE_URL          : {}", masked_db_url);
        tracing::info!("  DB_POOL_MAX           : {}", self.db_pool_max);
        tracing::info!("  PORT                  : {}", self.port);
        tracing::info!("  READINGS_WINDOW_HOURS : {}", self.window_hours);
        tracing::info!("  CHART_MAX_POINTS      : {}", self.chart_max_points);
    }
}

fn mask_password(url: &str) -> String {
    // ---
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            return format!("{}:****{}", &url[..colon_pos], &url[at_pos..]);
        }
    }
    url.to_string()
}
