//! Result aggregation.

use indexmap::IndexMap;

use crate::model::{Severity, ServerResult};

/// The assembled fleet report.
#[derive(Debug, Clone)]
pub struct Report {
    pub clusters: Vec<ClusterGroup>,
}

/// One cluster's servers, in scan-list order.
#[derive(Debug, Clone)]
pub struct ClusterGroup {
    pub name: String,
    pub results: Vec<ServerResult>,
}

/// Fleet-wide counts by worst per-server severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub servers: usize,
    pub normal: usize,
    pub degraded: usize,
    pub severe: usize,
    pub indeterminate: usize,
}

impl Report {
    /// Group scan results by cluster.
    ///
    /// Clusters appear in the order they were first seen; servers keep
    /// their input order inside each cluster. Nothing is sorted.
    pub fn from_results(results: Vec<ServerResult>) -> Self {
        let mut clusters: IndexMap<String, Vec<ServerResult>> = IndexMap::new();
        for result in results {
            clusters
                .entry(result.target.cluster.clone())
                .or_default()
                .push(result);
        }

        Report {
            clusters: clusters
                .into_iter()
                .map(|(name, results)| ClusterGroup { name, results })
                .collect(),
        }
    }

    /// All servers across clusters, report order.
    pub fn servers(&self) -> impl Iterator<Item = &ServerResult> {
        self.clusters.iter().flat_map(|c| c.results.iter())
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            servers: 0,
            normal: 0,
            degraded: 0,
            severe: 0,
            indeterminate: 0,
        };
        for result in self.servers() {
            summary.servers += 1;
            match result.worst_severity() {
                Severity::Normal => summary.normal += 1,
                Severity::Degraded => summary.degraded += 1,
                Severity::Severe => summary.severe += 1,
                Severity::Indeterminate => summary.indeterminate += 1,
            }
        }
        summary
    }
}
