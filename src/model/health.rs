//! Canonical health vocabulary.
//!
//! # Responsibilities
//! - Normalize vendor-reported health strings into one enum
//! - Derive the renderer-facing severity tier from health
//! - Represent one per-component health row

use std::fmt;

/// Normalized component health.
///
/// The first five values reflect what the device itself reported.
/// `Error` is reserved for transport/protocol failures (unreachable host,
/// auth rejection, timeout, malformed response) and always travels with a
/// human-readable cause in the row's `detail` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Ok,
    Warning,
    Critical,
    Failed,
    Unknown,
    Error,
}

impl HealthStatus {
    /// Map a vendor health string onto the canonical enum.
    ///
    /// Matching is case-insensitive. iLO aggregate entries report
    /// "Degraded" where Redfish proper says "Warning"; both normalize to
    /// [`HealthStatus::Warning`]. Anything unrecognized becomes `Unknown`,
    /// never an error.
    pub fn from_vendor(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ok" => HealthStatus::Ok,
            "warning" | "degraded" => HealthStatus::Warning,
            "critical" => HealthStatus::Critical,
            "failed" => HealthStatus::Failed,
            _ => HealthStatus::Unknown,
        }
    }

    /// The severity tier renderers key off.
    pub fn severity(self) -> Severity {
        match self {
            HealthStatus::Ok => Severity::Normal,
            HealthStatus::Warning => Severity::Degraded,
            HealthStatus::Critical | HealthStatus::Failed | HealthStatus::Error => {
                Severity::Severe
            }
            HealthStatus::Unknown => Severity::Indeterminate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Ok => "OK",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
            HealthStatus::Failed => "Failed",
            HealthStatus::Unknown => "Unknown",
            HealthStatus::Error => "Error",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renderer-facing severity tier.
///
/// The single normalization point between device health and presentation:
/// console colors, CSV columns and the JSON view all consume this tier and
/// never look at vendor strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Normal,
    Degraded,
    Severe,
    Indeterminate,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Degraded => "degraded",
            Severity::Severe => "severe",
            Severity::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which subsystem a health row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentCategory {
    System,
    Thermal,
    Power,
}

impl ComponentCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentCategory::System => "System",
            ComponentCategory::Thermal => "Thermal",
            ComponentCategory::Power => "Power",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the row every collector always attempts first.
pub const OVERALL_COMPONENT: &str = "Overall";

/// One normalized per-component health row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHealth {
    pub category: ComponentCategory,
    pub name: String,
    pub health: HealthStatus,
    /// Device-reported state, e.g. Redfish `Status.State` ("Enabled").
    pub state: Option<String>,
    /// Free-form extra: power state for the overall row, failure cause for
    /// `Error` rows.
    pub detail: Option<String>,
}

impl ComponentHealth {
    /// A device-reported row with no state/detail.
    pub fn device(category: ComponentCategory, name: impl Into<String>, health: HealthStatus) -> Self {
        Self {
            category,
            name: name.into(),
            health,
            state: None,
            detail: None,
        }
    }

    /// The System/Overall row.
    pub fn overall(health: HealthStatus, state: Option<String>, power_state: Option<String>) -> Self {
        Self {
            category: ComponentCategory::System,
            name: OVERALL_COMPONENT.to_string(),
            health,
            state,
            detail: power_state,
        }
    }

    /// A transport/protocol failure row; `cause` lands in `detail`.
    pub fn error(category: ComponentCategory, name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            health: HealthStatus::Error,
            state: None,
            detail: Some(cause.into()),
        }
    }

    pub fn severity(&self) -> Severity {
        self.health.severity()
    }
}
