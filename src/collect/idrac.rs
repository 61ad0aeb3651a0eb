//! Dell iDRAC Redfish dialect.
//!
//! # Responsibilities
//! - Answer the four protocol queries for iDRAC controllers
//! - Manage the Redfish session lifecycle around a collection pass
//!
//! # Design Decisions
//! - All queries ride one session token; Basic auth is only used to log in
//! - The session is always closed, even when collection fails mid-pass;
//!   cancellation closes it from Drop on a detached task
//! - Subsystem detail comes from the rollup blocks Dell embeds in the
//!   system document, so it costs no extra request

use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

use crate::collect::{
    classify_request_error, parse_fans, parse_overall, parse_power_supplies, read_json_body,
    run_queries, status_health, CollectError, CollectResult, Overall, ProtocolQueries,
    QueryContext,
};
use crate::model::{ComponentCategory, ComponentHealth, HealthStatus};

/// System document path, also used by protocol detection.
pub(crate) const SYSTEM_PATH: &str = "/redfish/v1/Systems/System.Embedded.1";

pub(crate) const SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";

const THERMAL_PATH: &str = "/redfish/v1/Chassis/1/Thermal";
const POWER_PATH: &str = "/redfish/v1/Chassis/1/Power";

/// Rollup blocks on the system document that carry per-subsystem health.
const SUBSYSTEM_SECTIONS: [&str; 5] =
    ["Power", "Processors", "Memory", "Storage", "NetworkAdapters"];

/// Collect health rows from an iDRAC controller.
///
/// Opens a session, runs the queries and closes the session regardless of
/// how the queries went. A login failure fails the whole server.
pub(crate) async fn collect(cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
    let session = RedfishSession::login(cx).await?;
    let queries = IdracQueries::new(session);
    let result = run_queries(&queries, cx).await;
    queries.into_session().logout().await;
    result
}

/// An authenticated Redfish session.
///
/// Obtained from the session service; every request carries the
/// `X-Auth-Token` header. Dropping an open session spawns a detached
/// delete so cancelled collections do not leak session slots (iDRACs
/// allow only a handful of concurrent sessions).
pub(crate) struct RedfishSession {
    client: reqwest::Client,
    token: String,
    session_url: Option<String>,
    query_timeout: Duration,
    open: bool,
}

impl RedfishSession {
    pub(crate) async fn login(cx: &QueryContext<'_>) -> CollectResult<Self> {
        let url = format!("{}{}", cx.base_url, SESSIONS_PATH);
        let body = serde_json::json!({
            "UserName": cx.credentials.username,
            "Password": cx.credentials.password,
        });

        let response = cx
            .client
            .post(&url)
            .json(&body)
            .timeout(cx.query_timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, cx.query_timeout))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(CollectError::Auth(status.as_u16()));
        }
        if !status.is_success() {
            return Err(CollectError::Status {
                path: SESSIONS_PATH.to_string(),
                status: status.as_u16(),
            });
        }

        let token = response
            .headers()
            .get("X-Auth-Token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| CollectError::Malformed {
                path: SESSIONS_PATH.to_string(),
                detail: "login response carried no X-Auth-Token header".to_string(),
            })?;

        let session_url = response
            .headers()
            .get("Location")
            .and_then(|v| v.to_str().ok())
            .map(|location| absolute_session_url(cx.base_url, location));

        tracing::debug!(base_url = %cx.base_url, "Redfish session opened");

        Ok(Self {
            client: cx.client.clone(),
            token,
            session_url,
            query_timeout: cx.query_timeout,
            open: true,
        })
    }

    async fn get_json(&self, cx: &QueryContext<'_>, path: &str) -> CollectResult<Value> {
        let url = format!("{}{}", cx.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", self.token.as_str())
            .timeout(cx.query_timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(e, cx.query_timeout))?;

        read_json_body(response, path, cx.query_timeout).await
    }

    /// Close the session. Best effort: the controller reaps stale sessions
    /// on its own, so a failed delete is only worth a debug line.
    pub(crate) async fn logout(mut self) {
        self.open = false;
        let url = match self.session_url.clone() {
            Some(url) => url,
            None => return,
        };

        let result = self
            .client
            .delete(&url)
            .header("X-Auth-Token", self.token.as_str())
            .timeout(self.query_timeout)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(url = %url, "Redfish session closed");
            }
            Ok(response) => {
                tracing::debug!(url = %url, status = %response.status(), "Session delete returned non-success");
            }
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Session delete failed");
            }
        }
    }
}

impl Drop for RedfishSession {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        // Reached when the collection future is cancelled, e.g. by the
        // per-server deadline. Drop must not block, so the delete rides a
        // detached task.
        let url = match self.session_url.take() {
            Some(url) => url,
            None => return,
        };
        let client = self.client.clone();
        let token = std::mem::take(&mut self.token);
        let timeout = self.query_timeout;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let _ = client
                    .delete(&url)
                    .header("X-Auth-Token", token.as_str())
                    .timeout(timeout)
                    .send()
                    .await;
            });
        }
    }
}

/// Resolve the login response's Location header against the controller base.
/// Most firmwares return a path; some return the full URL.
fn absolute_session_url(base_url: &str, location: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(location)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => format!("{}{}", base_url, location),
    }
}

pub(crate) struct IdracQueries {
    session: RedfishSession,
    system_doc: OnceCell<Value>,
}

impl IdracQueries {
    fn new(session: RedfishSession) -> Self {
        Self {
            session,
            system_doc: OnceCell::new(),
        }
    }

    fn into_session(self) -> RedfishSession {
        self.session
    }

    async fn system_doc(&self, cx: &QueryContext<'_>) -> CollectResult<&Value> {
        self.system_doc
            .get_or_try_init(|| self.session.get_json(cx, SYSTEM_PATH))
            .await
    }
}

impl ProtocolQueries for IdracQueries {
    async fn query_overall(&self, cx: &QueryContext<'_>) -> CollectResult<Overall> {
        Ok(parse_overall(self.system_doc(cx).await?))
    }

    async fn query_thermal(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
        Ok(parse_fans(&self.session.get_json(cx, THERMAL_PATH).await?))
    }

    async fn query_power(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
        Ok(parse_power_supplies(
            &self.session.get_json(cx, POWER_PATH).await?,
        ))
    }

    async fn query_subsystems(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
        // Same document as the overall query; OnceCell makes this free.
        Ok(parse_sections(self.system_doc(cx).await?))
    }
}

/// Subsystem rows from the rollup blocks on the system document.
///
/// A section that is absent or has no Status block reads as Unknown and is
/// reported; a silent gap would be indistinguishable from healthy.
fn parse_sections(doc: &Value) -> Vec<ComponentHealth> {
    let mut rows = Vec::new();
    for section in SUBSYSTEM_SECTIONS {
        let health = match doc.get(section) {
            Some(block) => status_health(block),
            None => HealthStatus::Unknown,
        };
        if health != HealthStatus::Ok {
            rows.push(ComponentHealth::device(
                ComponentCategory::System,
                section,
                health,
            ));
        }
    }
    rows
}
