//! Search run configuration.

use anyhow::{Result, bail};

/// Configuration for one similarity-join run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Pairs with distance strictly below this value qualify as matches.
    pub threshold: f32,
    /// Size of the fixed worker pool. Not sized to the host: correctness
    /// must not depend on it, and tests run with 1 as well as many.
    pub workers: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threshold: 300.0,
            workers: 8,
        }
    }
}

impl SearchOptions {
    /// Load options from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(val) = dotenvy::var("NEARDUP_THRESHOLD")
            && let Ok(threshold) = val.parse()
        {
            cfg.threshold = threshold;
        }

        if let Ok(val) = dotenvy::var("NEARDUP_WORKERS")
            && let Ok(workers) = val.parse()
        {
            cfg.workers = workers;
        }

        cfg
    }

    /// Reject unusable options before any worker is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("worker count must be at least 1");
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            bail!(
                "threshold must be finite and non-negative, got {}",
                self.threshold
            );
        }
        Ok(())
    }
}
