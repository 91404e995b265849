//! Memoized computed views.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::observable::{self, Dependency};

struct Memo<T> {
    value: T,
    deps: Vec<Dependency>,
}

/// A derived value cached until one of the cells it read is written.
///
/// Invalidation is pull-based: the memo checks its recorded dependency
/// versions on every read and recomputes only if one has moved. Views that
/// must not be cached (randomised ones) simply don't use this type.
pub struct Computed<T> {
    name: &'static str,
    memo: Mutex<Option<Memo<T>>>,
    evaluations: AtomicU64,
}

impl<T: Clone> Computed<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            memo: Mutex::new(None),
            evaluations: AtomicU64::new(0),
        }
    }

    /// Return the cached value, or evaluate `compute` if it is stale.
    pub fn get(&self, compute: impl FnOnce() -> T) -> T {
        {
            let memo = self.memo.lock();
            if let Some(memo) = memo.as_ref() {
                if !memo.deps.iter().any(Dependency::is_stale) {
                    observable::record_all(&memo.deps);
                    return memo.value.clone();
                }
            }
        }

        // Lock released while evaluating so the view may read other views.
        let (value, deps) = observable::track(compute);
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(view = self.name, deps = deps.len(), "view evaluated");

        *self.memo.lock() = Some(Memo {
            value: value.clone(),
            deps,
        });
        value
    }

    /// Number of times the view has been evaluated.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }
}

impl<T> std::fmt::Debug for Computed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Computed")
            .field("name", &self.name)
            .field("evaluations", &self.evaluations.load(Ordering::Relaxed))
            .finish()
    }
}
