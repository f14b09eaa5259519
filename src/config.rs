//! Centralized configuration management for pharmabill

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::table::DEFAULT_PAGE_SIZE;

pub const DEFAULT_STORE_NAME: &str = "MEDIPLUS MEDICAL & GENERAL";
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 100;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the JSON store
    pub data_dir: PathBuf,
    /// Directory for pharmabill.log
    pub log_dir: PathBuf,
    /// Where table exports, printed invoices and reports are written
    pub export_dir: PathBuf,
    /// Rows per table page
    pub page_size: NonZeroUsize,
    /// Dashboard chart refresh interval (milliseconds)
    pub chart_tick_ms: u64,
    /// Stock counts below this are reported as low
    pub low_stock_threshold: u32,
    /// Shop name printed on invoices and reports
    pub store_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./pharmabill-data"),
            log_dir: PathBuf::from("."),
            export_dir: PathBuf::from("."),
            page_size: DEFAULT_PAGE_SIZE,
            chart_tick_ms: 3000,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let data_dir = std::env::var("PHARMABILL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let log_dir = std::env::var("PHARMABILL_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        let export_dir = std::env::var("PHARMABILL_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let page_size = match parse_env_var::<usize>("PHARMABILL_PAGE_SIZE")? {
            Some(n) => NonZeroUsize::new(n)
                .ok_or_else(|| anyhow::anyhow!("PHARMABILL_PAGE_SIZE must be greater than zero"))?,
            None => defaults.page_size,
        };

        Ok(Config {
            data_dir,
            log_dir,
            export_dir,
            page_size,
            chart_tick_ms: parse_env_var("PHARMABILL_CHART_TICK_MS")?.unwrap_or(defaults.chart_tick_ms),
            low_stock_threshold: parse_env_var("PHARMABILL_LOW_STOCK")?
                .unwrap_or(defaults.low_stock_threshold),
            store_name: std::env::var("PHARMABILL_STORE_NAME").unwrap_or(defaults.store_name),
        })
    }

    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    /// Get chart refresh interval as Duration
    pub fn chart_tick(&self) -> Duration {
        Duration::from_millis(self.chart_tick_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chart_tick_ms == 0 {
            return Err(anyhow::anyhow!("Chart tick interval must be greater than zero"));
        }

        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Cannot create data directory: {}", self.data_dir.display()))?;

        std::fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("Cannot create export directory: {}", self.export_dir.display()))?;

        if !self.log_dir.exists() {
            return Err(anyhow::anyhow!(
                "Log directory does not exist: {}",
                self.log_dir.display()
            ));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
