//! Per-worker match accumulation.
//!
//! Each worker owns exactly one `MatchCollector` for the lifetime of the
//! parallel phase, so appends need no synchronization. Collectors are
//! only brought together after the join barrier, single-threaded, in
//! worker-index order.

/// One discovered pair: indices into the dataset with `left < right`,
/// and their Euclidean distance (strictly below the search threshold).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub left: u32,
    pub right: u32,
    pub distance: f32,
}

/// Append-only match list owned by a single worker.
#[derive(Debug, Default)]
pub struct MatchCollector {
    matches: Vec<Match>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a qualifying pair. Callers pass `left < right`; the nested
    /// scan order makes matches appear by increasing left index, then
    /// increasing right index.
    #[inline]
    pub fn record(&mut self, left: u32, right: u32, distance: f32) {
        debug_assert!(left < right, "match indices must satisfy left < right");
        self.matches.push(Match {
            left,
            right,
            distance,
        });
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}

/// Concatenate per-worker collectors into the final match sequence:
/// worker 0's matches first, then worker 1's, and so on. No cross-worker
/// ordering beyond that is guaranteed or meaningful.
pub fn merge(collectors: Vec<MatchCollector>) -> Vec<Match> {
    let total: usize = collectors.iter().map(MatchCollector::len).sum();
    let mut merged = Vec::with_capacity(total);
    for collector in collectors {
        merged.extend(collector.into_matches());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut collector = MatchCollector::new();
        collector.record(0, 3, 1.0);
        collector.record(0, 7, 2.0);
        collector.record(4, 5, 0.5);
        let matches = collector.into_matches();
        assert_eq!(matches.len(), 3);
        assert_eq!((matches[0].left, matches[0].right), (0, 3));
        assert_eq!((matches[2].left, matches[2].right), (4, 5));
    }

    #[test]
    fn test_merge_concatenates_in_worker_order() {
        let mut w0 = MatchCollector::new();
        w0.record(0, 2, 1.0);
        let mut w1 = MatchCollector::new();
        w1.record(1, 2, 2.0);
        w1.record(1, 3, 3.0);
        let w2 = MatchCollector::new();

        let merged = merge(vec![w0, w1, w2]);
        let order: Vec<(u32, u32)> = merged.iter().map(|m| (m.left, m.right)).collect();
        assert_eq!(order, vec![(0, 2), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
        assert!(merge(vec![MatchCollector::new()]).is_empty());
    }
}
