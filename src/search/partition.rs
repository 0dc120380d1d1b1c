//! Static work partitioning for the pairwise scan.
//!
//! The pair space {(i, j) : i < j < n} is triangular: row 0 has n-1
//! partners, the last row has none. Assigning contiguous row blocks to
//! workers would leave the worker holding the early rows with far more
//! comparisons than the rest, so ownership is interleaved instead:
//! worker `t` of `T` owns rows `t, t+T, t+2T, ...`. Expensive early rows
//! and cheap late rows are spread across all workers, and no two workers
//! ever see the same left row, so no pair is ever evaluated twice.

/// Left-row indices owned by `worker` out of `workers` total, for a
/// dataset of `rows` rows.
///
/// Ownership is deterministic and stateless: row `i` belongs to worker
/// `i % workers`. The union over all workers covers every row exactly
/// once, independent of the worker count.
#[inline]
pub fn owned_rows(worker: usize, workers: usize, rows: usize) -> impl Iterator<Item = usize> {
    debug_assert!(worker < workers, "worker id out of range");
    (worker..rows).step_by(workers.max(1))
}

/// Number of unordered pairs over `rows` rows: rows * (rows - 1) / 2.
pub fn pair_count(rows: usize) -> u64 {
    let n = rows as u64;
    n * n.saturating_sub(1) / 2
}
