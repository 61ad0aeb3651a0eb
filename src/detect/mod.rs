//! Protocol detection.
//!
//! # Responsibilities
//! - Decide which Redfish dialect a controller speaks
//! - Preserve the last probe failure for unreachable servers
//!
//! # Design Decisions
//! - Probes run in a fixed order (iLO, then iDRAC); the first HTTP 200 wins
//! - Only HTTP 200 counts as a match; 401 is wrong credentials, not proof
//!   of a different dialect, so it still fails the probe
//! - Detection never errors: an undetectable server is a result, not a bug

use crate::collect::{classify_request_error, idrac, ilo, QueryContext};
use crate::model::ProtocolKind;

/// What detection concluded for one server.
#[derive(Debug, Clone)]
pub struct DetectOutcome {
    pub kind: ProtocolKind,
    /// Last probe failure, set only when `kind` is [`ProtocolKind::Unknown`].
    pub failure: Option<String>,
}

/// Probe the dialect-specific system documents until one answers.
pub(crate) async fn detect(cx: &QueryContext<'_>) -> DetectOutcome {
    let probes = [
        (ProtocolKind::Ilo, ilo::SYSTEM_PATH),
        (ProtocolKind::Idrac, idrac::SYSTEM_PATH),
    ];

    let mut last_failure = None;
    for (kind, path) in probes {
        match probe(cx, path).await {
            Ok(()) => {
                tracing::debug!(base_url = %cx.base_url, protocol = %kind, "Protocol detected");
                return DetectOutcome {
                    kind,
                    failure: None,
                };
            }
            Err(failure) => {
                tracing::debug!(base_url = %cx.base_url, protocol = %kind, failure = %failure, "Probe failed");
                last_failure = Some(failure);
            }
        }
    }

    DetectOutcome {
        kind: ProtocolKind::Unknown,
        failure: last_failure,
    }
}

async fn probe(cx: &QueryContext<'_>, path: &str) -> Result<(), String> {
    let url = format!("{}{}", cx.base_url, path);
    let response = cx
        .client
        .get(&url)
        .basic_auth(&cx.credentials.username, Some(&cx.credentials.password))
        .timeout(cx.query_timeout)
        .send()
        .await
        .map_err(|e| classify_request_error(e, cx.query_timeout).to_string())?;

    let status = response.status().as_u16();
    if status == 200 {
        Ok(())
    } else {
        Err(format!("HTTP {} from {}", status, path))
    }
}
