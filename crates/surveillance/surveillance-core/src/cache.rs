//! Memoizing cache for analysis results.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use surveillance_spi::{AnalysisResult, Result, Window};

/// Identity of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Caller-chosen identity of the source table.
    pub table: String,
    pub metric: String,
    pub window: Window,
}

impl CacheKey {
    pub fn new(table: impl Into<String>, metric: impl Into<String>, window: Window) -> Self {
        Self {
            table: table.into(),
            metric: metric.into(),
            window,
        }
    }
}

type Slot = Arc<OnceLock<Result<Arc<AnalysisResult>>>>;

/// Thread-safe analysis cache.
///
/// Each key is computed at most once: concurrent requests for a key that is
/// being computed wait for that computation and share its outcome, errors
/// included.
#[derive(Debug, Clone, Default)]
pub struct AnalysisCache {
    slots: Arc<DashMap<CacheKey, Slot>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome for `key`, running `compute` if none exists yet.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Result<Arc<AnalysisResult>>
    where
        F: FnOnce() -> Result<AnalysisResult>,
    {
        // clone the slot out so the shard lock is released before computing
        let slot = Arc::clone(self.slots.entry(key).or_default().value());
        slot.get_or_init(|| compute().map(Arc::new)).clone()
    }

    /// Drop every entry computed from `table`.
    pub fn invalidate_table(&self, table: &str) {
        self.slots.retain(|key, _| key.table != table);
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
