//! # Configuration
//!
//! TOML configuration for the server and for report shaping.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100          # requests per second, 0 disables
//! cors_origins = ["https://escuela.example"]   # empty = localhost only, "*" = any
//! body_limit_bytes = 2097152
//!
//! [report]
//! top_critical_limit = 10   # 0 keeps every entry
//!
//! [report.level_thresholds]
//! consolidated = 87.5
//! advanced = 62.5
//! developing = 37.5
//! emerging = 12.5
//! ```
//!
//! ## Resolution order
//!
//! 1. `--config <path>` or `MATURITY_CONFIG`
//! 2. built-in defaults for anything the file leaves out
//! 3. `MATURITY_RATE_LIMIT` / `MATURITY_CORS_ORIGINS` environment overrides
//! 4. CLI flags (`--host`, `--port`) applied by the `server` command

use crate::error::AppError;
use maturity_core::LevelThresholds;
use maturity_core::SchoolAggregateOptions;
use maturity_core::primitives::DEFAULT_TOP_CRITICAL_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum configuration file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Default request body limit (2 MB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub report: ReportConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only, `["*"]` allows any.
    pub cors_origins: Vec<String>,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: Vec::new(),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Report shaping settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Length of the recurring critical indicator ranking; 0 keeps every entry.
    pub top_critical_limit: usize,
    /// Score bands used when summarizing response scores.
    pub level_thresholds: LevelThresholds,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_critical_limit: DEFAULT_TOP_CRITICAL_LIMIT,
            level_thresholds: LevelThresholds::default(),
        }
    }
}

impl ReportConfig {
    /// Options passed to the school aggregator.
    #[must_use]
    pub fn school_options(&self) -> SchoolAggregateOptions {
        SchoolAggregateOptions {
            top_critical_limit: (self.top_critical_limit > 0).then_some(self.top_critical_limit),
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, AppError> {
        let config: AppConfig =
            toml::from_str(text).map_err(|e| AppError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            AppError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(AppError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Load from `path`, else from `MATURITY_CONFIG`, else defaults; then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let from_env = std::env::var("MATURITY_CONFIG").ok().map(PathBuf::from);
        let mut config = match path.or(from_env.as_deref()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration file");
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply `MATURITY_RATE_LIMIT` and `MATURITY_CORS_ORIGINS` from `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("MATURITY_RATE_LIMIT") {
            match raw.trim().parse() {
                Ok(rate) => self.server.rate_limit = rate,
                Err(e) => tracing::warn!("Ignoring MATURITY_RATE_LIMIT '{}': {}", raw, e),
            }
        }
        if let Some(raw) = lookup("MATURITY_CORS_ORIGINS") {
            self.server.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.server.body_limit_bytes == 0 {
            return Err(AppError::Config(
                "server.body_limit_bytes must be greater than 0".to_string(),
            ));
        }
        let t = &self.report.level_thresholds;
        let ordered = 0.0 <= t.emerging
            && t.emerging < t.developing
            && t.developing < t.advanced
            && t.advanced < t.consolidated
            && t.consolidated <= 100.0;
        if !ordered {
            return Err(AppError::Config(
                "report.level_thresholds must increase strictly within [0, 100]".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = AppConfig::from_toml("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.rate_limit, 100);
        assert_eq!(config.report.top_critical_limit, DEFAULT_TOP_CRITICAL_LIMIT);
    }

    #[test]
    fn zero_limit_is_unbounded() {
        let config = AppConfig::from_toml("[report]\ntop_critical_limit = 0\n").unwrap();
        assert_eq!(config.report.school_options().top_critical_limit, None);

        let default = ReportConfig::default().school_options();
        assert_eq!(default.top_critical_limit, Some(DEFAULT_TOP_CRITICAL_LIMIT));
    }

    #[test]
    fn unordered_thresholds_rejected() {
        let text = "[report.level_thresholds]\nconsolidated = 50.0\nadvanced = 60.0\n";
        assert!(matches!(AppConfig::from_toml(text), Err(AppError::Config(_))));
    }

    #[test]
    fn invalid_toml_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[server\nport = "),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "MATURITY_RATE_LIMIT" => Some("0".to_string()),
            "MATURITY_CORS_ORIGINS" => Some("https://a.cl, https://b.cl,".to_string()),
            _ => None,
        });
        assert_eq!(config.server.rate_limit, 0);
        assert_eq!(config.server.cors_origins, ["https://a.cl", "https://b.cl"]);
    }

    #[test]
    fn bad_rate_override_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "MATURITY_RATE_LIMIT").then(|| "fast".to_string()));
        assert_eq!(config.server.rate_limit, 100);
    }
}
