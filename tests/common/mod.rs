//! Shared utilities for integration tests: mock management controllers.
//!
//! Every mock binds an ephemeral port on 127.0.0.1 and serves the Redfish
//! paths the scanner knows about. Targets point at the mock through their
//! explicit address override, and test configs switch the engine to plain
//! HTTP.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use fleet_health::config::FleetConfig;
use fleet_health::model::{Credentials, ServerTarget};
use fleet_health::scan::ScanEngine;

/// Bind an ephemeral port and serve the router from a background task.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// An address nothing listens on; connections are refused immediately.
pub async fn refused_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A listener that accepts connections and never answers them.
pub async fn start_black_hole() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        let _socket = socket;
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Scan config pointed at plain-HTTP mocks, with retries off so request
/// counts stay deterministic.
pub fn test_config(concurrency: usize, probe_ms: u64, server_ms: u64) -> FleetConfig {
    let mut config = FleetConfig::default();
    config.http.scheme = "http".to_string();
    config.scan.concurrency_limit = concurrency;
    config.scan.probe_timeout_secs = probe_ms as f64 / 1000.0;
    config.scan.server_timeout_secs = server_ms as f64 / 1000.0;
    config.retries.max_retries = 0;
    config
}

pub fn engine(config: &FleetConfig) -> Arc<ScanEngine> {
    Arc::new(ScanEngine::new(config, Credentials::new("admin", "secret")).unwrap())
}

pub fn target(name: &str, cluster: &str, addr: SocketAddr) -> ServerTarget {
    ServerTarget::new(name, cluster).with_address(addr.to_string())
}

// ---------------------------------------------------------------------------
// iLO mocks
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct IloState {
    pub system_hits: AtomicU32,
    pub thermal_hits: AtomicU32,
    pub power_hits: AtomicU32,
}

#[derive(Clone)]
struct IloApp {
    state: Arc<IloState>,
    system: Value,
    thermal: Value,
    power: Value,
}

async fn ilo_system(State(app): State<IloApp>) -> Json<Value> {
    app.state.system_hits.fetch_add(1, Ordering::SeqCst);
    Json(app.system.clone())
}

async fn ilo_thermal(State(app): State<IloApp>) -> Json<Value> {
    app.state.thermal_hits.fetch_add(1, Ordering::SeqCst);
    Json(app.thermal.clone())
}

async fn ilo_power(State(app): State<IloApp>) -> Json<Value> {
    app.state.power_hits.fetch_add(1, Ordering::SeqCst);
    Json(app.power.clone())
}

fn ilo_router(app: IloApp) -> Router {
    Router::new()
        .route("/redfish/v1/Systems/1", get(ilo_system))
        .route("/redfish/v1/Chassis/1/Thermal", get(ilo_thermal))
        .route("/redfish/v1/Chassis/1/Power", get(ilo_power))
        .with_state(app)
}

fn chassis_docs() -> (Value, Value) {
    let thermal = json!({
        "Fans": [
            {"Name": "Fan 1", "Status": {"Health": "OK"}},
            {"Name": "Fan 2", "Status": {"Health": "Critical"}}
        ]
    });
    let power = json!({
        "PowerSupplies": [
            {"Name": "PS 1", "Status": {"Health": "OK"}},
            {"Name": "PS 2", "Status": {"Health": "Warning"}}
        ]
    });
    (thermal, power)
}

/// iLO whose overall health is OK.
pub async fn start_healthy_ilo() -> (SocketAddr, Arc<IloState>) {
    let state = Arc::new(IloState::default());
    let (thermal, power) = chassis_docs();
    let app = IloApp {
        state: Arc::clone(&state),
        system: json!({
            "Status": {"Health": "OK", "State": "Enabled"},
            "PowerState": "On"
        }),
        thermal,
        power,
    };
    (serve(ilo_router(app)).await, state)
}

/// iLO reporting Warning overall, with a degraded Memory subsystem.
pub async fn start_degraded_ilo() -> (SocketAddr, Arc<IloState>) {
    let state = Arc::new(IloState::default());
    let (thermal, power) = chassis_docs();
    let app = IloApp {
        state: Arc::clone(&state),
        system: json!({
            "Status": {"Health": "Warning", "State": "Enabled"},
            "PowerState": "On",
            "Oem": {"Hpe": {"AggregateHealthStatus": {
                "Fans": "OK",
                "Memory": "Degraded",
                "Storage": "OK"
            }}}
        }),
        thermal,
        power,
    };
    (serve(ilo_router(app)).await, state)
}

/// A controller answering both dialects' system documents with HTTP 200.
/// Exercises detection priority: iLO is probed first and must win.
pub async fn start_dual_dialect_controller() -> SocketAddr {
    async fn healthy_system() -> Json<Value> {
        Json(json!({
            "Status": {"Health": "OK", "State": "Enabled"},
            "PowerState": "On"
        }))
    }
    let router = Router::new()
        .route("/redfish/v1/Systems/1", get(healthy_system))
        .route("/redfish/v1/Systems/System.Embedded.1", get(healthy_system));
    serve(router).await
}

// ---------------------------------------------------------------------------
// Flaky iLO, for retry tests
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct FlakyApp {
    state: Arc<IloState>,
    fail_first: u32,
}

async fn flaky_system(State(app): State<FlakyApp>) -> Response {
    let hit = app.state.system_hits.fetch_add(1, Ordering::SeqCst) + 1;
    if hit <= app.fail_first {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "Status": {"Health": "OK", "State": "Enabled"},
        "PowerState": "On"
    }))
    .into_response()
}

/// iLO whose system endpoint answers HTTP 500 for the first `fail_first`
/// queries and recovers afterwards. Pass `u32::MAX` for one that never does.
pub async fn start_flaky_ilo(fail_first: u32) -> (SocketAddr, Arc<IloState>) {
    let state = Arc::new(IloState::default());
    let app = FlakyApp {
        state: Arc::clone(&state),
        fail_first,
    };
    let router = Router::new()
        .route("/redfish/v1/Systems/1", get(flaky_system))
        .with_state(app);
    (serve(router).await, state)
}

// ---------------------------------------------------------------------------
// Slow iLO with an in-flight gauge, for concurrency tests
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct GaugeState {
    in_flight: AtomicI64,
    max_in_flight: AtomicI64,
}

impl GaugeState {
    pub fn max_seen(&self) -> i64 {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct SlowApp {
    gauge: Arc<GaugeState>,
    delay: Duration,
}

async fn slow_system(State(app): State<SlowApp>) -> Json<Value> {
    let current = app.gauge.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    app.gauge.max_in_flight.fetch_max(current, Ordering::SeqCst);
    tokio::time::sleep(app.delay).await;
    app.gauge.in_flight.fetch_sub(1, Ordering::SeqCst);
    Json(json!({
        "Status": {"Health": "OK", "State": "Enabled"},
        "PowerState": "On"
    }))
}

/// Healthy iLO that holds every system query for `delay` and records the
/// highest number of requests it saw in flight at once.
pub async fn start_slow_ilo(delay: Duration) -> (SocketAddr, Arc<GaugeState>) {
    let gauge = Arc::new(GaugeState::default());
    let app = SlowApp {
        gauge: Arc::clone(&gauge),
        delay,
    };
    let router = Router::new()
        .route("/redfish/v1/Systems/1", get(slow_system))
        .with_state(app);
    (serve(router).await, gauge)
}

// ---------------------------------------------------------------------------
// iDRAC mocks
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct IdracState {
    pub sessions_opened: AtomicU32,
    pub sessions_closed: AtomicU32,
    pub system_hits: AtomicU32,
}

#[derive(Clone)]
struct IdracApp {
    state: Arc<IdracState>,
    system: Value,
    thermal: Value,
    power: Value,
    /// Return 500 for token-authenticated system queries (login still works).
    fail_with_token: bool,
    /// Hold token-authenticated system queries far past any deadline.
    hang_with_token: bool,
    /// Return 500 for the thermal document.
    fail_thermal: bool,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.contains_key("x-auth-token") || headers.contains_key(header::AUTHORIZATION)
}

async fn idrac_open_session(State(app): State<IdracApp>) -> impl IntoResponse {
    let n = app.state.sessions_opened.fetch_add(1, Ordering::SeqCst) + 1;
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-auth-token",
        HeaderValue::from_str(&format!("token-{}", n)).unwrap(),
    );
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&format!("/redfish/v1/SessionService/Sessions/{}", n)).unwrap(),
    );
    (StatusCode::CREATED, headers, Json(json!({"Id": n})))
}

async fn idrac_close_session(
    State(app): State<IdracApp>,
    Path(_id): Path<String>,
) -> StatusCode {
    app.state.sessions_closed.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

async fn idrac_system(State(app): State<IdracApp>, headers: HeaderMap) -> Response {
    app.state.system_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if app.fail_with_token && headers.contains_key("x-auth-token") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if app.hang_with_token && headers.contains_key("x-auth-token") {
        tokio::time::sleep(Duration::from_secs(60)).await;
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(app.system.clone()).into_response()
}

async fn idrac_thermal(State(app): State<IdracApp>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if app.fail_thermal {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(app.thermal.clone()).into_response()
}

async fn idrac_power(State(app): State<IdracApp>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(app.power.clone()).into_response()
}

fn idrac_router(app: IdracApp) -> Router {
    Router::new()
        .route("/redfish/v1/SessionService/Sessions", post(idrac_open_session))
        .route(
            "/redfish/v1/SessionService/Sessions/{id}",
            delete(idrac_close_session),
        )
        .route("/redfish/v1/Systems/System.Embedded.1", get(idrac_system))
        .route("/redfish/v1/Chassis/1/Thermal", get(idrac_thermal))
        .route("/redfish/v1/Chassis/1/Power", get(idrac_power))
        .with_state(app)
}

fn idrac_app(state: Arc<IdracState>, system: Value) -> IdracApp {
    let (thermal, power) = chassis_docs();
    IdracApp {
        state,
        system,
        thermal,
        power,
        fail_with_token: false,
        hang_with_token: false,
        fail_thermal: false,
    }
}

fn healthy_idrac_system() -> Value {
    json!({
        "Status": {"Health": "OK", "State": "Enabled"},
        "PowerState": "On"
    })
}

fn degraded_idrac_system() -> Value {
    json!({
        "Status": {"Health": "Warning", "State": "Enabled"},
        "PowerState": "On",
        "Power": {"Status": {"Health": "OK"}},
        "Processors": {"Status": {"Health": "OK"}},
        "Memory": {"Status": {"Health": "Critical"}},
        "Storage": {"Status": {"Health": "OK"}},
        "NetworkAdapters": {"Status": {"Health": "OK"}}
    })
}

/// iDRAC whose overall health is OK.
pub async fn start_healthy_idrac() -> (SocketAddr, Arc<IdracState>) {
    let state = Arc::new(IdracState::default());
    let app = idrac_app(Arc::clone(&state), healthy_idrac_system());
    (serve(idrac_router(app)).await, state)
}

/// iDRAC reporting Warning overall with a Critical Memory rollup.
/// `fail_thermal` makes the thermal document return HTTP 500.
pub async fn start_degraded_idrac(fail_thermal: bool) -> (SocketAddr, Arc<IdracState>) {
    let state = Arc::new(IdracState::default());
    let mut app = idrac_app(Arc::clone(&state), degraded_idrac_system());
    app.fail_thermal = fail_thermal;
    (serve(idrac_router(app)).await, state)
}

/// iDRAC where login works but token-authenticated queries return 500.
/// Detection (Basic auth) succeeds, collection fails after login.
pub async fn start_idrac_failing_system() -> (SocketAddr, Arc<IdracState>) {
    let state = Arc::new(IdracState::default());
    let mut app = idrac_app(Arc::clone(&state), healthy_idrac_system());
    app.fail_with_token = true;
    (serve(idrac_router(app)).await, state)
}

/// iDRAC where login works but the token-authenticated system query never
/// answers, so the per-server deadline abandons the scan mid-collection.
pub async fn start_idrac_hanging_system() -> (SocketAddr, Arc<IdracState>) {
    let state = Arc::new(IdracState::default());
    let mut app = idrac_app(Arc::clone(&state), healthy_idrac_system());
    app.hang_with_token = true;
    (serve(idrac_router(app)).await, state)
}
