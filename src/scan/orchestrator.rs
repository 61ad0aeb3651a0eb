//! Concurrent fan-out across the fleet.
//!
//! # Responsibilities
//! - Spawn one task per target, bounded by the concurrency limit
//! - Reassemble results into input order
//! - Guarantee a result for every target, aborted tasks included
//!
//! # Design Decisions
//! - All tasks are spawned up front; the semaphore does the throttling
//! - Tasks return (index, result) pairs so completion order is irrelevant
//! - A panicked task leaves a hole that is backfilled with a failure row

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::model::{ProtocolKind, ServerResult, ServerTarget};
use crate::scan::{runner, ScanEngine};

pub(crate) async fn run(engine: &Arc<ScanEngine>, targets: Vec<ServerTarget>) -> Vec<ServerResult> {
    let total = targets.len();
    tracing::info!(
        servers = total,
        concurrency = engine.scan.concurrency_limit,
        "Scan starting"
    );

    let semaphore = Arc::new(Semaphore::new(engine.scan.concurrency_limit));
    let mut tasks: JoinSet<(usize, ServerResult)> = JoinSet::new();

    for (index, target) in targets.iter().enumerate() {
        let engine = Arc::clone(engine);
        let semaphore = Arc::clone(&semaphore);
        let target = target.clone();
        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                // Only possible if the semaphore is closed, i.e. the scan
                // itself was torn down.
                Err(_) => {
                    return (
                        index,
                        ServerResult::failed(target, ProtocolKind::Unknown, "scan cancelled"),
                    )
                }
            };
            let result = runner::run_one(&engine, &target).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<ServerResult>> = Vec::with_capacity(total);
    slots.resize_with(total, || None);

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => {
                tracing::error!(error = %e, "Scan task aborted");
            }
        }
    }

    let results: Vec<ServerResult> = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                ServerResult::failed(
                    targets[index].clone(),
                    ProtocolKind::Unknown,
                    "scan task aborted",
                )
            })
        })
        .collect();

    tracing::info!(servers = results.len(), "Scan complete");
    results
}
