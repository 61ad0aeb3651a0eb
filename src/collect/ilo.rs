//! HP iLO Redfish dialect.
//!
//! # Responsibilities
//! - Answer the four protocol queries for iLO controllers
//! - Drill into the HPE aggregate health map for subsystem detail
//!
//! iLO serves everything over HTTP Basic auth. The system document is
//! fetched once and shared between the overall and subsystem queries.

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::collect::{
    get_json, parse_fans, parse_overall, parse_power_supplies, run_queries, status_health,
    CollectResult, Overall, ProtocolQueries, QueryContext,
};
use crate::model::{ComponentCategory, ComponentHealth, HealthStatus};

/// System document path, also used by protocol detection.
pub(crate) const SYSTEM_PATH: &str = "/redfish/v1/Systems/1";

const THERMAL_PATH: &str = "/redfish/v1/Chassis/1/Thermal";
const POWER_PATH: &str = "/redfish/v1/Chassis/1/Power";

/// Collect health rows from an iLO controller.
pub(crate) async fn collect(cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
    let queries = IloQueries::new();
    run_queries(&queries, cx).await
}

pub(crate) struct IloQueries {
    system_doc: OnceCell<Value>,
}

impl IloQueries {
    pub(crate) fn new() -> Self {
        Self {
            system_doc: OnceCell::new(),
        }
    }

    async fn system_doc(&self, cx: &QueryContext<'_>) -> CollectResult<&Value> {
        self.system_doc
            .get_or_try_init(|| get_json(cx, SYSTEM_PATH))
            .await
    }
}

impl ProtocolQueries for IloQueries {
    async fn query_overall(&self, cx: &QueryContext<'_>) -> CollectResult<Overall> {
        Ok(parse_overall(self.system_doc(cx).await?))
    }

    async fn query_thermal(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
        Ok(parse_fans(&get_json(cx, THERMAL_PATH).await?))
    }

    async fn query_power(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
        Ok(parse_power_supplies(&get_json(cx, POWER_PATH).await?))
    }

    async fn query_subsystems(&self, cx: &QueryContext<'_>) -> CollectResult<Vec<ComponentHealth>> {
        // Same document as the overall query; OnceCell makes this free.
        Ok(parse_aggregate(self.system_doc(cx).await?))
    }
}

/// Parse `Oem.Hpe.AggregateHealthStatus` into subsystem rows.
///
/// iLO 4 nests the map under `Oem.Hp` instead of `Oem.Hpe`. Entry values
/// are either bare strings (`"Fans": "OK"`) or objects carrying a Status
/// block (`"Fans": {"Status": {"Health": "OK"}}`); both shapes appear in
/// the wild, sometimes in the same payload. Only entries that are not OK
/// become rows.
fn parse_aggregate(doc: &Value) -> Vec<ComponentHealth> {
    let oem = match doc.get("Oem") {
        Some(oem) => oem,
        None => return Vec::new(),
    };
    let aggregate = ["Hpe", "Hp"]
        .iter()
        .find_map(|vendor| oem.get(*vendor).and_then(|v| v.get("AggregateHealthStatus")))
        .and_then(Value::as_object);
    let aggregate = match aggregate {
        Some(aggregate) => aggregate,
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for (subsystem, value) in aggregate {
        let health = match value {
            Value::String(s) => HealthStatus::from_vendor(s),
            Value::Object(_) => status_health(value),
            _ => continue,
        };
        if health != HealthStatus::Ok {
            rows.push(ComponentHealth::device(
                ComponentCategory::System,
                subsystem.clone(),
                health,
            ));
        }
    }
    rows
}
