//! Partition scheduler
//!
//! A fixed pool of workers pulls partitions from a shared queue until it is
//! empty. Each partition runs in its own task, so an error or a panic in one
//! partition is recorded against that partition only and the worker moves
//! on to the next one.

use crate::crawler::PartitionKey;
use crate::output::{PartitionOutcome, PartitionStats, RunSummary};
use crate::WalkerError;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinSet;

type Queue = Arc<Mutex<VecDeque<PartitionKey>>>;

/// Runs `unit` once per partition on `min(workers, partitions)` workers
///
/// Returns once every partition has been attempted exactly once. The
/// summary holds one report per partition, in completion order.
///
/// # Arguments
///
/// * `partitions` - Letters to walk, each attempted once
/// * `workers` - Upper bound on concurrent partitions
/// * `unit` - Walks one partition; errors and panics fail only that partition
pub async fn run<F, Fut>(partitions: Vec<PartitionKey>, workers: usize, unit: F) -> RunSummary
where
    F: Fn(PartitionKey) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PartitionStats, WalkerError>> + Send + 'static,
{
    let worker_count = workers.max(1).min(partitions.len());
    tracing::info!(
        "Scheduling {} partitions on {} workers",
        partitions.len(),
        worker_count
    );

    let queue: Queue = Arc::new(Mutex::new(partitions.into_iter().collect()));
    let unit = Arc::new(unit);
    let mut pool = JoinSet::new();

    for worker_id in 0..worker_count {
        let queue = Arc::clone(&queue);
        let unit = Arc::clone(&unit);
        pool.spawn(async move {
            let mut reports = Vec::new();
            while let Some(key) = next_partition(&queue) {
                tracing::info!("Worker {} took partition {}", worker_id, key);
                let outcome = run_partition(key, tokio::spawn((unit.as_ref())(key))).await;
                reports.push((key, outcome));
            }
            tracing::debug!("Worker {} found the queue empty", worker_id);
            reports
        });
    }

    let mut summary = RunSummary::new();
    while let Some(joined) = pool.join_next().await {
        match joined {
            Ok(reports) => {
                for (key, outcome) in reports {
                    summary.record(key, outcome);
                }
            }
            // Workers only await partition tasks, so this is a runtime shutdown
            Err(e) => tracing::error!("Worker lost: {}", e),
        }
    }

    summary
}

fn next_partition(queue: &Queue) -> Option<PartitionKey> {
    queue
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .pop_front()
}

/// Waits for one partition task and turns its end into an outcome
async fn run_partition(
    key: PartitionKey,
    task: tokio::task::JoinHandle<Result<PartitionStats, WalkerError>>,
) -> PartitionOutcome {
    match task.await {
        Ok(Ok(stats)) => {
            tracing::info!("Partition {} completed", key);
            PartitionOutcome::Completed(stats)
        }
        Ok(Err(e)) => {
            tracing::error!("Partition {} failed: {}", key, e);
            PartitionOutcome::Failed {
                reason: e.to_string(),
            }
        }
        Err(e) if e.is_panic() => {
            tracing::error!("Partition {} panicked", key);
            PartitionOutcome::Failed {
                reason: "worker panicked".to_string(),
            }
        }
        Err(e) => {
            tracing::error!("Partition {} was cancelled: {}", key, e);
            PartitionOutcome::Failed {
                reason: "worker cancelled".to_string(),
            }
        }
    }
}
