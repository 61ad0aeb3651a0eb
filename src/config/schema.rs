//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the scanner.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the fleet scanner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FleetConfig {
    /// Concurrency and deadline settings for the scan engine.
    pub scan: ScanConfig,

    /// Bounded retry settings for the per-server runner.
    pub retries: RetryConfig,

    /// HTTP client settings for talking to management controllers.
    pub http: HttpClientConfig,

    /// Report output settings.
    pub output: OutputConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Scan engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum number of servers scanned concurrently.
    pub concurrency_limit: usize,

    /// Deadline for a single protocol probe or health query, in seconds.
    pub probe_timeout_secs: f64,

    /// Overall deadline for one server (resolve, detect, collect, and any
    /// retries), in seconds.
    pub server_timeout_secs: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: 10,
            probe_timeout_secs: 5.0,
            server_timeout_secs: 15.0,
        }
    }
}

impl ScanConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.probe_timeout_secs)
    }

    pub fn server_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.server_timeout_secs)
    }
}

/// Retry configuration.
///
/// A retry re-runs the whole detect-and-collect pass for a server whose
/// first pass produced no health data at all. Retries never extend the
/// per-server deadline.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of re-invocations after a total failure.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// URL scheme used for controller endpoints ("https" or "http").
    pub scheme: String,

    /// Accept self-signed or otherwise invalid TLS certificates.
    /// Management controllers almost always ship self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            accept_invalid_certs: true,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Also write the report as CSV to this path.
    pub csv_path: Option<String>,

    /// Colorize the console report by severity tier.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            color: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = FleetConfig::default();
        assert_eq!(config.scan.concurrency_limit, 10);
        assert_eq!(config.scan.probe_timeout_secs, 5.0);
        assert_eq!(config.scan.server_timeout_secs, 15.0);
        assert_eq!(config.retries.max_retries, 1);
        assert_eq!(config.http.scheme, "https");
        assert!(config.http.accept_invalid_certs);
        assert!(config.output.color);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let toml = r#"
            [scan]
            concurrency_limit = 4

            [http]
            scheme = "http"
        "#;
        let config: FleetConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.scan.concurrency_limit, 4);
        assert_eq!(config.scan.probe_timeout_secs, 5.0);
        assert_eq!(config.http.scheme, "http");
        assert_eq!(config.retries.max_retries, 1);
    }

    #[test]
    fn timeouts_convert_to_durations() {
        let scan = ScanConfig {
            probe_timeout_secs: 0.5,
            server_timeout_secs: 2.0,
            ..ScanConfig::default()
        };
        assert_eq!(scan.probe_timeout(), Duration::from_millis(500));
        assert_eq!(scan.server_timeout(), Duration::from_secs(2));
    }
}
