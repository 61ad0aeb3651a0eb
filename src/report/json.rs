//! JSON rendering.

use serde::Serialize;

use crate::report::aggregate::Report;

/// JSON view of the whole report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportJson {
    pub summary: SummaryJson,
    pub clusters: Vec<ClusterJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryJson {
    pub servers: usize,
    pub normal: usize,
    pub degraded: usize,
    pub severe: usize,
    pub indeterminate: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterJson {
    pub name: String,
    pub servers: Vec<ServerJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerJson {
    pub hostname: String,
    pub protocol: String,
    /// Worst severity across this server's components.
    pub severity: String,
    pub components: Vec<ComponentJson>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentJson {
    pub category: String,
    pub name: String,
    pub health: String,
    pub severity: String,
    pub state: Option<String>,
    pub detail: Option<String>,
}

/// Serialize the report as pretty-printed JSON.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&report_json(report))
}

fn report_json(report: &Report) -> ReportJson {
    let summary = report.summary();

    ReportJson {
        summary: SummaryJson {
            servers: summary.servers,
            normal: summary.normal,
            degraded: summary.degraded,
            severe: summary.severe,
            indeterminate: summary.indeterminate,
        },
        clusters: report
            .clusters
            .iter()
            .map(|cluster| ClusterJson {
                name: cluster.name.clone(),
                servers: cluster
                    .results
                    .iter()
                    .map(|result| ServerJson {
                        hostname: result.target.identifier.clone(),
                        protocol: result.protocol.as_str().to_string(),
                        severity: result.worst_severity().as_str().to_string(),
                        components: result
                            .rows
                            .iter()
                            .map(|row| ComponentJson {
                                category: row.category.as_str().to_string(),
                                name: row.name.clone(),
                                health: row.health.as_str().to_string(),
                                severity: row.severity().as_str().to_string(),
                                state: row.state.clone(),
                                detail: row.detail.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect(),
    }
}
