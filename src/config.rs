//! Configuration management for Docgate.

use serde::{Deserialize, Serialize};

use crate::error::{DocgateError, Result};
use crate::gate::TimeWindow;

/// Main configuration for the Docgate client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocgateConfig {
    /// Document-creation endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Rate gate configuration
    #[serde(default)]
    pub gate: GateConfig,
}

impl Default for DocgateConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            gate: GateConfig::default(),
        }
    }
}

fn default_endpoint() -> String {
    "https://ismp.crpt.ru/api/v3/lk/documents/create".to_string()
}

/// Rate gate configuration.
///
/// `request_limit` bounds admissions per window; `max_concurrency` bounds
/// simultaneous in-flight calls. When `max_concurrency` is absent it defaults
/// to `request_limit`, matching clients that configure a single limit for
/// both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Length of the rolling accounting window
    #[serde(default = "default_window")]
    pub window: TimeWindow,

    /// Maximum calls admitted within one window
    #[serde(default = "default_request_limit")]
    pub request_limit: u64,

    /// Maximum simultaneous in-flight calls
    pub max_concurrency: Option<usize>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            request_limit: default_request_limit(),
            max_concurrency: None,
        }
    }
}

fn default_window() -> TimeWindow {
    TimeWindow::Minute
}

fn default_request_limit() -> u64 {
    5
}

impl GateConfig {
    /// The effective concurrency ceiling.
    ///
    /// A `request_limit` beyond the platform's pointer width saturates rather
    /// than truncating; gate construction rejects the oversized value.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(|| usize::try_from(self.request_limit).unwrap_or(usize::MAX))
    }
}

impl DocgateConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: DocgateConfig =
            serde_yaml::from_str(&contents).map_err(|e| DocgateError::Config(e.to_string()))?;
        Ok(config)
    }
}
