//! Scan engine.
//!
//! # Data Flow
//! ```text
//! Vec<ServerTarget>
//!     → orchestrator.rs (semaphore-bounded fan-out, one task per server)
//!     → runner.rs (resolve → detect → collect under one deadline,
//!                  bounded retry on total failure)
//!     → Vec<ServerResult> (same length and order as the input)
//! ```
//!
//! # Design Decisions
//! - Results are index-keyed; input order survives concurrent completion
//! - Every server produces exactly one result, even if its task panics
//! - One shared HTTP client; controllers get self-signed TLS acceptance
//! - The per-server deadline covers resolution, detection, collection and
//!   any retries together

use std::sync::Arc;

use crate::config::{FleetConfig, RetryConfig, ScanConfig};
use crate::model::{Credentials, ServerResult, ServerTarget};

pub mod backoff;
pub mod orchestrator;
pub mod runner;

/// A reusable scan engine: one HTTP client, one credential set, many scans.
pub struct ScanEngine {
    pub(crate) client: reqwest::Client,
    pub(crate) credentials: Credentials,
    pub(crate) scan: ScanConfig,
    pub(crate) retries: RetryConfig,
    pub(crate) scheme: String,
}

impl ScanEngine {
    pub fn new(config: &FleetConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.http.accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            credentials,
            scan: config.scan.clone(),
            retries: config.retries.clone(),
            scheme: config.http.scheme.clone(),
        })
    }

    /// Scan every target, returning one result per target in input order.
    pub async fn scan(self: &Arc<Self>, targets: Vec<ServerTarget>) -> Vec<ServerResult> {
        orchestrator::run(self, targets).await
    }
}
