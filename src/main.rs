//! Fleet health scanner.
//!
//! Polls the out-of-band management controllers of an HP/Dell server
//! fleet and reports per-component health, grouped by cluster.
//!
//! # Architecture Overview
//!
//! ```text
//!   fleet list ──┐                ┌──────────────────────────────────┐
//!                │                │            SCAN ENGINE           │
//!   credentials ─┤                │                                  │
//!                ▼                │  per server (bounded fan-out):   │
//!          ┌──────────┐           │   ┌─────────┐    ┌───────────┐   │
//!          │  input   │──────────▶│   │ resolve │───▶│  detect   │   │
//!          │ adapters │           │   └─────────┘    │ iLO/iDRAC │   │
//!          └──────────┘           │                  └─────┬─────┘   │
//!                                 │                        ▼         │
//!                                 │                  ┌───────────┐   │
//!                                 │                  │  collect  │   │
//!                                 │                  │ (4 queries)│  │
//!                                 │                  └─────┬─────┘   │
//!                                 └────────────────────────┼─────────┘
//!                                                          ▼
//!                                  ┌───────────┐    ┌─────────────┐
//!                                  │ aggregate │───▶│  console /  │
//!                                  │by cluster │    │ CSV / JSON  │
//!                                  └───────────┘    └─────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_health::config::{load_config, Overrides};
use fleet_health::input;
use fleet_health::report::{self, Report};
use fleet_health::scan::ScanEngine;

#[derive(Parser)]
#[command(name = "fleet-health")]
#[command(about = "Concurrent health scanner for iLO/iDRAC server fleets", long_about = None)]
struct Cli {
    /// Fleet list: cluster-sectioned text, or CSV with a Hostname column.
    #[arg(short, long)]
    targets: PathBuf,

    /// Credentials file: key=value lines, or JSON with username/password.
    #[arg(short = 'u', long)]
    credentials: PathBuf,

    /// Optional TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report as CSV to this path.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the report as JSON to this path.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Override the configured concurrency limit.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Override the per-query probe timeout, in seconds.
    #[arg(long)]
    probe_timeout: Option<f64>,

    /// Override the per-server deadline, in seconds.
    #[arg(long)]
    server_timeout: Option<f64>,

    /// Disable colored console output.
    #[arg(long)]
    no_color: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(
        cli.config.as_deref(),
        &Overrides {
            concurrency_limit: cli.concurrency,
            probe_timeout_secs: cli.probe_timeout,
            server_timeout_secs: cli.server_timeout,
            no_color: cli.no_color,
        },
    )?;

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("fleet_health={}", config.observability.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let color = config.output.color;
    if !color {
        colored::control::set_override(false);
    }

    tracing::info!("fleet-health v0.1.0 starting");

    let targets = input::load_targets(&cli.targets.to_string_lossy())?;
    let credentials = input::load_credentials(&cli.credentials.to_string_lossy())?;

    tracing::info!(
        servers = targets.len(),
        source = %cli.targets.display(),
        "Fleet list loaded"
    );

    let engine = Arc::new(ScanEngine::new(&config, credentials)?);
    let results = engine.scan(targets).await;

    let report = Report::from_results(results);
    print!("{}", report::render_console(&report, color));

    let csv_path = cli
        .csv
        .as_deref()
        .or(config.output.csv_path.as_deref().map(Path::new));
    if let Some(path) = csv_path {
        std::fs::write(path, report::render_csv(&report))?;
        tracing::info!(path = %path.display(), "CSV report written");
    }
    if let Some(path) = &cli.json {
        std::fs::write(path, report::render_json(&report)?)?;
        tracing::info!(path = %path.display(), "JSON report written");
    }

    let summary = report.summary();
    tracing::info!(
        servers = summary.servers,
        severe = summary.severe,
        degraded = summary.degraded,
        indeterminate = summary.indeterminate,
        "Scan finished"
    );

    Ok(())
}
