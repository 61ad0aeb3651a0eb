//! Per-server scan pass.
//!
//! # Responsibilities
//! - Resolve, detect and collect for one server under one deadline
//! - Retry a totally-failed pass while deadline budget remains
//! - Translate every failure mode into a result row, never a panic
//!
//! # Design Decisions
//! - Each phase is clamped to the time remaining until the deadline; a
//!   retry never extends it
//! - A pass that produced any device-reported row is not retried;
//!   retries are only for servers that yielded nothing

use std::net::IpAddr;

use tokio::net;
use tokio::time::{self, Instant};

use crate::collect::{collect, QueryContext};
use crate::detect::detect;
use crate::model::{ProtocolKind, ServerResult, ServerTarget};
use crate::scan::{backoff, ScanEngine};

/// Scan one server, retrying within the deadline on total failure.
pub(crate) async fn run_one(engine: &ScanEngine, target: &ServerTarget) -> ServerResult {
    let deadline = Instant::now() + engine.scan.server_timeout();
    let mut attempt: u32 = 0;

    let result = loop {
        let result = attempt_scan(engine, target, deadline).await;
        if !result.is_total_failure() {
            break result;
        }
        if attempt >= engine.retries.max_retries {
            tracing::warn!(
                server = %target.identifier,
                cluster = %target.cluster,
                "Server yielded no health data"
            );
            break result;
        }

        attempt += 1;
        let delay = backoff::retry_delay(attempt, &engine.retries);
        if deadline.saturating_duration_since(Instant::now()) <= delay {
            tracing::warn!(
                server = %target.identifier,
                cluster = %target.cluster,
                "Server budget exhausted before retry"
            );
            break result;
        }
        tracing::debug!(server = %target.identifier, attempt, "Retrying server after total failure");
        time::sleep(delay).await;
    };

    tracing::debug!(
        server = %target.identifier,
        protocol = %result.protocol,
        rows = result.rows.len(),
        severity = %result.worst_severity(),
        "Server scanned"
    );
    result
}

/// One resolve → detect → collect pass, each phase clamped to the deadline.
async fn attempt_scan(
    engine: &ScanEngine,
    target: &ServerTarget,
    deadline: Instant,
) -> ServerResult {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return deadline_result(target, ProtocolKind::Unknown, "resolution");
    }
    let address = match time::timeout(remaining, resolve(target)).await {
        Ok(Ok(address)) => address,
        Ok(Err(cause)) => {
            return ServerResult::failed(target.clone(), ProtocolKind::Unknown, cause)
        }
        Err(_) => return deadline_result(target, ProtocolKind::Unknown, "resolution"),
    };

    let base_url = format!("{}://{}", engine.scheme, address);
    let cx = QueryContext {
        client: &engine.client,
        base_url: &base_url,
        credentials: &engine.credentials,
        query_timeout: engine.scan.probe_timeout(),
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return deadline_result(target, ProtocolKind::Unknown, "detection");
    }
    let outcome = match time::timeout(remaining, detect(&cx)).await {
        Ok(outcome) => outcome,
        Err(_) => return deadline_result(target, ProtocolKind::Unknown, "detection"),
    };

    if outcome.kind == ProtocolKind::Unknown {
        let cause = match outcome.failure {
            Some(failure) => format!("protocol undetermined ({})", failure),
            None => "protocol undetermined".to_string(),
        };
        return ServerResult::failed(target.clone(), ProtocolKind::Unknown, cause);
    }

    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return deadline_result(target, outcome.kind, "collection");
    }
    match time::timeout(remaining, collect(outcome.kind, &cx)).await {
        Ok(Ok(rows)) => ServerResult::new(target.clone(), outcome.kind, rows),
        Ok(Err(e)) => ServerResult::failed(target.clone(), outcome.kind, e.to_string()),
        Err(_) => deadline_result(target, outcome.kind, "collection"),
    }
}

fn deadline_result(target: &ServerTarget, protocol: ProtocolKind, phase: &str) -> ServerResult {
    ServerResult::failed(
        target.clone(),
        protocol,
        format!("server deadline exhausted during {}", phase),
    )
}

/// Resolve a target to the address its URLs will use.
///
/// An explicit `address` on the target (tests, pinned controllers) wins and
/// may carry a port. Hostnames resolve through the system resolver; the
/// first address is used.
async fn resolve(target: &ServerTarget) -> Result<String, String> {
    if let Some(address) = &target.address {
        return Ok(address.clone());
    }

    let query = format!("{}:443", target.identifier);
    let mut addresses = net::lookup_host(query).await.map_err(|e| {
        format!("hostname resolution failed for {} ({})", target.identifier, e)
    })?;
    match addresses.next() {
        Some(addr) => Ok(format_ip(addr.ip())),
        None => Err(format!(
            "hostname resolution failed for {} (no addresses)",
            target.identifier
        )),
    }
}

/// IPv6 literals need brackets inside a URL authority.
fn format_ip(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{}]", v6),
    }
}
