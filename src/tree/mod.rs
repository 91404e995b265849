//! Observable tree engine.
//!
//! Mutable node fields live in [`Observable`] cells. Views evaluated through
//! [`Computed`] record which cells they read and are re-evaluated on the next
//! read after any of those cells is written. Writes are only accepted inside
//! an [`action`], which is also the unit listeners are notified about.

pub mod action;
mod computed;
mod listener;
mod observable;

pub use computed::Computed;
pub use listener::{ActionEvent, Listener, ListenerId, ListenerRegistry};
pub use observable::{track, Dependency, Observable};
