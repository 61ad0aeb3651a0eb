//! Health collection subsystem.
//!
//! # Responsibilities
//! - Drive the four protocol queries against one controller
//! - Parse Redfish payloads into normalized [`ComponentHealth`] rows
//! - Isolate failures: a broken drill-down query degrades to an error row
//!
//! # Data Flow
//! ```text
//! detected protocol (ilo / idrac)
//!     → collect() dispatches to the dialect driver
//!     → query_overall (system document)
//!     → overall OK?  yes → single row, done
//!                    no  → query_thermal + query_power + query_subsystems
//!     → Vec<ComponentHealth> (device rows + error rows)
//! ```
//!
//! # Design Decisions
//! - Failure of the overall query fails the whole server; the runner may retry
//! - Failure of a drill-down query yields one Error row, never aborts the rest
//! - Payloads are parsed leniently: missing fields become Unknown, not errors
//! - Dialects differ only behind [`ProtocolQueries`]; the driver is shared

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::model::{ComponentCategory, ComponentHealth, Credentials, HealthStatus, ProtocolKind};

pub mod idrac;
pub mod ilo;

/// Everything a dialect needs to query one controller.
pub struct QueryContext<'a> {
    pub client: &'a reqwest::Client,
    /// Scheme + resolved address, no trailing slash (e.g. `https://10.4.0.17`).
    pub base_url: &'a str,
    pub credentials: &'a Credentials,
    /// Deadline applied to each individual HTTP request.
    pub query_timeout: Duration,
}

/// Errors from querying a management controller.
#[derive(Debug, Error)]
pub enum CollectError {
    /// Connection-level failure (refused, reset, DNS, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// A single query exceeded its deadline.
    #[error("query timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Controller rejected the credentials.
    #[error("authentication rejected (HTTP {0})")]
    Auth(u16),

    /// Unexpected HTTP status.
    #[error("unexpected HTTP {status} from {path}")]
    Status { path: String, status: u16 },

    /// Response body was not the JSON shape the dialect expects.
    #[error("malformed response from {path}: {detail}")]
    Malformed { path: String, detail: String },

    /// No supported management protocol was detected for the server.
    #[error("no supported management protocol detected")]
    NoProtocol,
}

/// Result type for collection operations.
pub type CollectResult<T> = Result<T, CollectError>;

/// Top-level summary parsed from a system document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overall {
    pub health: HealthStatus,
    pub state: Option<String>,
    pub power_state: Option<String>,
}

impl Overall {
    pub fn into_row(self) -> ComponentHealth {
        ComponentHealth::overall(self.health, self.state, self.power_state)
    }
}

/// The four queries every dialect answers.
///
/// `query_overall` must be cheap to call once and is always issued first.
/// The remaining three are only issued when the overall health is not OK.
pub(crate) trait ProtocolQueries {
    async fn query_overall(&self, cx: &QueryContext<'_>) -> CollectResult<Overall>;
    async fn query_thermal(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>>;
    async fn query_power(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>>;
    async fn query_subsystems(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>>;
}

/// Shared query driver.
///
/// Issues the overall query, then drills into thermal, power and subsystem
/// detail only when the controller itself reports something other than OK.
/// Drill-down failures are recorded as Error rows so one bad endpoint never
/// hides the rest of the picture.
pub(crate) async fn run_queries<Q: ProtocolQueries>(
    queries: &Q,
    cx: &QueryContext<'_>,
) -> CollectResult<Vec<ComponentHealth>> {
    let overall = queries.query_overall(cx).await?;
    let healthy = overall.health == HealthStatus::Ok;
    let mut rows = vec![overall.into_row()];

    if healthy {
        return Ok(rows);
    }

    match queries.query_thermal(cx).await {
        Ok(mut fans) => rows.append(&mut fans),
        Err(e) => {
            tracing::debug!(error = %e, "Thermal query failed");
            rows.push(ComponentHealth::error(
                ComponentCategory::Thermal,
                "Fans",
                e.to_string(),
            ));
        }
    }

    match queries.query_power(cx).await {
        Ok(mut supplies) => rows.append(&mut supplies),
        Err(e) => {
            tracing::debug!(error = %e, "Power query failed");
            rows.push(ComponentHealth::error(
                ComponentCategory::Power,
                "PowerSupplies",
                e.to_string(),
            ));
        }
    }

    match queries.query_subsystems(cx).await {
        Ok(mut subsystems) => rows.append(&mut subsystems),
        Err(e) => {
            tracing::debug!(error = %e, "Subsystem query failed");
            rows.push(ComponentHealth::error(
                ComponentCategory::System,
                "Subsystems",
                e.to_string(),
            ));
        }
    }

    Ok(rows)
}

/// Collect health rows from a server whose protocol is already known.
pub async fn collect(
    kind: ProtocolKind,
    cx: &QueryContext<'_>,
) -> CollectResult<Vec<ComponentHealth>> {
    match kind {
        ProtocolKind::Ilo => ilo::collect(cx).await,
        ProtocolKind::Idrac => idrac::collect(cx).await,
        ProtocolKind::Unknown => Err(CollectError::NoProtocol),
    }
}

/// GET a JSON document using HTTP Basic credentials.
pub(crate) async fn get_json(cx: &QueryContext<'_>, path: &str) -> CollectResult<Value> {
    let url = format!("{}{}", cx.base_url, path);
    let response = cx
        .client
        .get(&url)
        .basic_auth(&cx.credentials.username, Some(&cx.credentials.password))
        .timeout(cx.query_timeout)
        .send()
        .await
        .map_err(|e| classify_request_error(e, cx.query_timeout))?;

    read_json_body(response, path, cx.query_timeout).await
}

/// Map status codes and decode the body, shared by both auth schemes.
pub(crate) async fn read_json_body(
    response: reqwest::Response,
    path: &str,
    timeout: Duration,
) -> CollectResult<Value> {
    let status = response.status();
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(CollectError::Auth(status.as_u16()));
    }
    if !status.is_success() {
        return Err(CollectError::Status {
            path: path.to_string(),
            status: status.as_u16(),
        });
    }

    response.json::<Value>().await.map_err(|e| {
        if e.is_timeout() {
            CollectError::Timeout(timeout)
        } else {
            CollectError::Malformed {
                path: path.to_string(),
                detail: e.to_string(),
            }
        }
    })
}

pub(crate) fn classify_request_error(e: reqwest::Error, timeout: Duration) -> CollectError {
    if e.is_timeout() {
        CollectError::Timeout(timeout)
    } else {
        CollectError::Transport(e.to_string())
    }
}

/// Read `Status.Health` leniently; anything missing is Unknown.
pub(crate) fn status_health(obj: &Value) -> HealthStatus {
    obj.get("Status")
        .and_then(|s| s.get("Health"))
        .and_then(Value::as_str)
        .map(HealthStatus::from_vendor)
        .unwrap_or(HealthStatus::Unknown)
}

pub(crate) fn status_state(obj: &Value) -> Option<String> {
    obj.get("Status")
        .and_then(|s| s.get("State"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse the overall row fields out of a system document.
pub(crate) fn parse_overall(doc: &Value) -> Overall {
    Overall {
        health: status_health(doc),
        state: status_state(doc),
        power_state: doc
            .get("PowerState")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Fan rows from a Redfish `Thermal` document.
pub(crate) fn parse_fans(doc: &Value) -> Vec<ComponentHealth> {
    device_rows(doc, "Fans", ComponentCategory::Thermal, "Fan")
}

/// Power supply rows from a Redfish `Power` document.
pub(crate) fn parse_power_supplies(doc: &Value) -> Vec<ComponentHealth> {
    device_rows(doc, "PowerSupplies", ComponentCategory::Power, "PowerSupply")
}

fn device_rows(
    doc: &Value,
    key: &str,
    category: ComponentCategory,
    fallback: &str,
) -> Vec<ComponentHealth> {
    let devices = match doc.get(key).and_then(Value::as_array) {
        Some(devices) => devices,
        None => return Vec::new(),
    };
    devices
        .iter()
        .enumerate()
        .map(|(i, device)| {
            ComponentHealth::device(category, device_name(device, fallback, i), status_health(device))
        })
        .collect()
}

/// Device display name. iLO 4 thermal entries use `FanName`; everything
/// newer uses `Name`. Unnamed devices get a positional fallback.
fn device_name(device: &Value, fallback: &str, index: usize) -> String {
    for key in ["Name", "FanName"] {
        if let Some(name) = device.get(key).and_then(Value::as_str) {
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    format!("{} {}", fallback, index + 1)
}
