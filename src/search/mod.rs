//! Pairwise similarity search engine.
//!
//! The exhaustive O(n²) join over a descriptor table, split into:
//!
//! - **[`kernel`]**: SIMD Euclidean distance with a scalar fallback.
//! - **[`partition`]**: interleaved assignment of the triangular pair
//!   space to workers.
//! - **[`collector`]**: per-worker match accumulation and the
//!   worker-order merge.
//! - **[`engine`]**: orchestration: fixed worker pool, scan, join
//!   barrier, merge.

pub mod collector;
pub mod engine;
pub mod kernel;
pub mod partition;
