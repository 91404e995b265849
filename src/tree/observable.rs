//! Observable cells and read tracking.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::action;
use crate::model::ModelError;

static NEXT_CELL_ID: AtomicU64 = AtomicU64::new(1);

/// Identity and version of one observable field.
#[derive(Debug)]
pub(crate) struct CellCore {
    id: u64,
    path: String,
    version: AtomicU64,
}

/// A read recorded while a view was being evaluated.
#[derive(Debug, Clone)]
pub struct Dependency {
    cell: Arc<CellCore>,
    version: u64,
}

impl Dependency {
    pub fn path(&self) -> &str {
        &self.cell.path
    }

    /// True once the cell has been written since this read.
    pub fn is_stale(&self) -> bool {
        self.cell.version.load(Ordering::Acquire) != self.version
    }
}

thread_local! {
    static TRACKING: RefCell<Vec<Vec<Dependency>>> = const { RefCell::new(Vec::new()) };
}

/// Evaluate `f`, collecting every observable read it performs.
///
/// Reads are also reported to any evaluation enclosing this one.
pub fn track<R>(f: impl FnOnce() -> R) -> (R, Vec<Dependency>) {
    TRACKING.with(|frames| frames.borrow_mut().push(Vec::new()));
    let value = {
        let _unwind = scopeguard::guard_on_unwind((), |()| {
            TRACKING.with(|frames| {
                frames.borrow_mut().pop();
            });
        });
        f()
    };
    let deps = TRACKING.with(|frames| frames.borrow_mut().pop().unwrap_or_default());
    record_all(&deps);
    (value, deps)
}

/// Report already-known dependencies to the current evaluation, if any.
pub(crate) fn record_all(deps: &[Dependency]) {
    TRACKING.with(|frames| {
        if let Some(frame) = frames.borrow_mut().last_mut() {
            for dep in deps {
                push_unique(frame, dep.clone());
            }
        }
    });
}

fn record(cell: &Arc<CellCore>) {
    TRACKING.with(|frames| {
        if let Some(frame) = frames.borrow_mut().last_mut() {
            push_unique(
                frame,
                Dependency {
                    cell: Arc::clone(cell),
                    version: cell.version.load(Ordering::Acquire),
                },
            );
        }
    });
}

fn push_unique(frame: &mut Vec<Dependency>, dep: Dependency) {
    if !frame.iter().any(|existing| existing.cell.id == dep.cell.id) {
        frame.push(dep);
    }
}

/// A mutable field of a tree node.
///
/// Reads are tracked by enclosing view evaluations; writes are only
/// accepted inside an action.
pub struct Observable<T> {
    core: Arc<CellCore>,
    value: RwLock<T>,
}

impl<T> Observable<T> {
    pub fn new(path: impl Into<String>, value: T) -> Self {
        Self {
            core: Arc::new(CellCore {
                id: NEXT_CELL_ID.fetch_add(1, Ordering::Relaxed),
                path: path.into(),
                version: AtomicU64::new(0),
            }),
            value: RwLock::new(value),
        }
    }

    /// Tree path used in diagnostics, e.g. `Question(7).guess`.
    pub fn path(&self) -> &str {
        &self.core.path
    }

    pub fn version(&self) -> u64 {
        self.core.version.load(Ordering::Acquire)
    }

    /// Read through a borrow, recording the dependency.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        record(&self.core);
        f(&self.value.read())
    }

    /// Write a new value, returning the previous one.
    ///
    /// # Errors
    /// Returns [`ModelError::IllegalMutation`] when called outside an action.
    pub fn replace(&self, value: T) -> Result<T, ModelError> {
        let Some(action_name) = action::current() else {
            return Err(ModelError::IllegalMutation {
                path: self.core.path.clone(),
            });
        };

        let previous = std::mem::replace(&mut *self.value.write(), value);
        self.core.version.fetch_add(1, Ordering::AcqRel);
        action::record_write(&self.core.path);

        tracing::trace!(action = action_name, path = %self.core.path, "cell written");
        Ok(previous)
    }

    pub fn set(&self, value: T) -> Result<(), ModelError> {
        self.replace(value).map(drop)
    }
}

impl<T: Clone> Observable<T> {
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("path", &self.core.path)
            .field("version", &self.version())
            .field("value", &*self.value.read())
            .finish()
    }
}
