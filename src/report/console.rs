//! Console rendering.

use colored::Colorize;

use crate::model::{HealthStatus, Severity};
use crate::report::aggregate::Report;

const HEALTH_WIDTH: usize = 8;

/// Render the report for a terminal.
///
/// Healthy servers take one line; degraded servers get their component
/// rows indented underneath. Failure causes are printed inline since they
/// are the only clue an unreachable server leaves behind.
pub fn render_console(report: &Report, color: bool) -> String {
    let name_width = report
        .servers()
        .map(|r| r.target.identifier.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for cluster in &report.clusters {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("Cluster: {}\n", cluster.name));

        for result in &cluster.results {
            let overall = &result.rows[0];
            out.push_str(&format!(
                "  {:<name_width$}  {:<7}  {}",
                result.target.identifier,
                result.protocol.as_str(),
                painted_health(overall.health, color),
            ));
            if overall.health == HealthStatus::Error {
                if let Some(cause) = &overall.detail {
                    out.push_str(&format!("  {}", cause));
                }
            }
            out.push('\n');

            for row in &result.rows[1..] {
                out.push_str(&format!(
                    "      {:<8} {:<name_width$}  {}",
                    row.category.as_str(),
                    row.name,
                    painted_health(row.health, color),
                ));
                if row.health == HealthStatus::Error {
                    if let Some(cause) = &row.detail {
                        out.push_str(&format!("  {}", cause));
                    }
                }
                out.push('\n');
            }
        }
    }

    let summary = report.summary();
    out.push_str(&format!(
        "\n{} servers: {} normal, {} degraded, {} severe, {} indeterminate\n",
        summary.servers, summary.normal, summary.degraded, summary.severe, summary.indeterminate
    ));
    out
}

/// Pad first, then color: ANSI escapes would break `{:<width$}`.
fn painted_health(health: HealthStatus, color: bool) -> String {
    let padded = format!("{:<width$}", health.as_str(), width = HEALTH_WIDTH);
    if !color {
        return padded;
    }
    match health.severity() {
        Severity::Normal => padded.green().to_string(),
        Severity::Degraded => padded.yellow().to_string(),
        Severity::Severe => padded.red().to_string(),
        Severity::Indeterminate => padded.dimmed().to_string(),
    }
}
