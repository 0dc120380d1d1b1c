//! Search orchestration.
//!
//! One scan task per worker id runs on a dedicated pool of exactly
//! `workers` threads. Each task owns its collector outright; the dataset
//! is shared by `&`-borrow and never written during the parallel phase,
//! so the whole search runs without a single lock. The pool install is a
//! full barrier: nothing downstream observes partial results, and the
//! worker-order merge afterwards is single-threaded.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::{debug, info};

use super::collector::{self, Match, MatchCollector};
use super::kernel;
use super::partition;
use crate::config::SearchOptions;
use crate::dataset::Dataset;

/// Cooperative cancellation flag for a running search.
///
/// Cheap to clone and share with another thread; workers poll it once
/// per owned left row. A cancelled search fails as a whole; partial
/// results are never returned.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Find every descriptor pair with distance strictly below the threshold.
///
/// The returned sequence is ordered by worker index, and within one
/// worker by scan order (increasing left index, then right index). The
/// match SET does not depend on the worker count.
pub fn search(dataset: &Dataset, options: &SearchOptions) -> Result<Vec<Match>> {
    search_with_cancel(dataset, options, &CancelFlag::new())
}

/// [`search`] with an externally owned cancellation flag.
pub fn search_with_cancel(
    dataset: &Dataset,
    options: &SearchOptions,
    cancel: &CancelFlag,
) -> Result<Vec<Match>> {
    options.validate()?;

    let rows = dataset.len();
    let started = Instant::now();
    debug!(
        rows,
        pairs = partition::pair_count(rows),
        workers = options.workers,
        threshold = options.threshold,
        "starting pairwise scan"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .thread_name(|worker| format!("neardup-worker-{worker}"))
        .build()
        .context("build worker thread pool")?;

    let collectors: Vec<MatchCollector> = pool.install(|| {
        (0..options.workers)
            .into_par_iter()
            .map(|worker| scan_partition(dataset, options, worker, cancel))
            .collect()
    });

    if cancel.is_cancelled() {
        bail!("search cancelled");
    }

    for (worker, collected) in collectors.iter().enumerate() {
        debug!(worker, matches = collected.len(), "worker finished");
    }
    let merged = collector::merge(collectors);
    info!(
        rows,
        matches = merged.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pairwise scan complete"
    );
    Ok(merged)
}

/// Scan every pair whose left row is owned by `worker`.
fn scan_partition(
    dataset: &Dataset,
    options: &SearchOptions,
    worker: usize,
    cancel: &CancelFlag,
) -> MatchCollector {
    let rows = dataset.len();
    let mut collected = MatchCollector::new();
    for i in partition::owned_rows(worker, options.workers, rows) {
        if cancel.is_cancelled() {
            break;
        }
        let left = dataset.row(i);
        for j in (i + 1)..rows {
            let dist = kernel::distance(left, dataset.row(j));
            if dist < options.threshold {
                collected.record(i as u32, j as u32, dist);
            }
        }
    }
    collected
}
