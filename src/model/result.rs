//! Per-server scan results.

use crate::model::health::{ComponentCategory, ComponentHealth, HealthStatus, Severity, OVERALL_COMPONENT};
use crate::model::protocol::ProtocolKind;
use crate::model::target::ServerTarget;

/// Everything the scan learned about one target.
///
/// Exactly one of these exists per target, produced when the task runner
/// completes, whether it succeeded or failed. The aggregator never sees a
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResult {
    pub target: ServerTarget,
    pub protocol: ProtocolKind,
    pub rows: Vec<ComponentHealth>,
}

impl ServerResult {
    pub fn new(target: ServerTarget, protocol: ProtocolKind, mut rows: Vec<ComponentHealth>) -> Self {
        if rows.is_empty() {
            rows.push(ComponentHealth::error(
                ComponentCategory::System,
                OVERALL_COMPONENT,
                "collector returned no health data",
            ));
        }
        Self { target, protocol, rows }
    }

    /// The synthetic single-row result for a target that failed entirely.
    pub fn failed(target: ServerTarget, protocol: ProtocolKind, cause: impl Into<String>) -> Self {
        Self {
            target,
            protocol,
            rows: vec![ComponentHealth::error(
                ComponentCategory::System,
                OVERALL_COMPONENT,
                cause,
            )],
        }
    }

    /// True when nothing beyond a single transport-level error row was
    /// produced. Drives the runner's bounded retry.
    pub fn is_total_failure(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].health == HealthStatus::Error
    }

    /// Worst severity across all rows; `Normal` for an empty-in-theory set.
    pub fn worst_severity(&self) -> Severity {
        let rank = |s: Severity| match s {
            Severity::Normal => 0,
            Severity::Indeterminate => 1,
            Severity::Degraded => 2,
            Severity::Severe => 3,
        };
        self.rows
            .iter()
            .map(|row| row.severity())
            .max_by_key(|s| rank(*s))
            .unwrap_or(Severity::Normal)
    }
}
