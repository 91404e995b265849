//! Action events and their listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;

/// Record of one committed outermost action.
#[derive(Debug, Clone)]
pub struct ActionEvent {
    /// When the action committed.
    pub timestamp: SystemTime,
    /// Action name, e.g. `setGuess`.
    pub name: &'static str,
    /// Identifier of the node the action targeted, if any.
    pub target: Option<String>,
    /// Paths of every cell written.
    pub writes: Vec<String>,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Arc<dyn Fn(&ActionEvent) + Send + Sync>;

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
}

impl ListenerRegistry {
    pub fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    /// Returns false if the listener was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Call every listener in subscription order.
    ///
    /// The list is copied first, so listeners may subscribe, unsubscribe or
    /// run further actions.
    pub fn notify(&self, event: &ActionEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}
