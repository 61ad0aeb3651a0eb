//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//! - Check cross-field consistency (probe timeout fits in server timeout)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FleetConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::FleetConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    ZeroConcurrency,
    NonPositiveTimeout { field: &'static str },
    ProbeExceedsServerTimeout,
    BackoffRange { base_ms: u64, max_ms: u64 },
    UnknownScheme(String),
    UnknownLogLevel(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::ZeroConcurrency => {
                write!(f, "scan.concurrency_limit must be at least 1")
            }
            ValidationError::NonPositiveTimeout { field } => {
                write!(f, "{} must be a positive number of seconds", field)
            }
            ValidationError::ProbeExceedsServerTimeout => {
                write!(f, "scan.probe_timeout_secs must not exceed scan.server_timeout_secs")
            }
            ValidationError::BackoffRange { base_ms, max_ms } => {
                write!(
                    f,
                    "retries.max_delay_ms ({}) must be >= retries.base_delay_ms ({})",
                    max_ms, base_ms
                )
            }
            ValidationError::UnknownScheme(s) => {
                write!(f, "http.scheme must be \"https\" or \"http\", got \"{}\"", s)
            }
            ValidationError::UnknownLogLevel(level) => {
                write!(f, "observability.log_level \"{}\" is not a valid level", level)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &FleetConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.scan.concurrency_limit == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    // NaN fails the is_finite check, so it cannot sneak past either branch.
    if config.scan.probe_timeout_secs <= 0.0 || !config.scan.probe_timeout_secs.is_finite() {
        errors.push(ValidationError::NonPositiveTimeout {
            field: "scan.probe_timeout_secs",
        });
    }
    if config.scan.server_timeout_secs <= 0.0 || !config.scan.server_timeout_secs.is_finite() {
        errors.push(ValidationError::NonPositiveTimeout {
            field: "scan.server_timeout_secs",
        });
    } else if config.scan.probe_timeout_secs > config.scan.server_timeout_secs {
        errors.push(ValidationError::ProbeExceedsServerTimeout);
    }

    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::BackoffRange {
            base_ms: config.retries.base_delay_ms,
            max_ms: config.retries.max_delay_ms,
        });
    }

    match config.http.scheme.as_str() {
        "https" | "http" => {}
        other => errors.push(ValidationError::UnknownScheme(other.to_string())),
    }

    match config.observability.log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        other => errors.push(ValidationError::UnknownLogLevel(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
