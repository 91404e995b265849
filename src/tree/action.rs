//! Action context.
//!
//! Every write to an [`Observable`](super::Observable) must happen while an
//! action is running on the current thread. Actions are synchronous, so a
//! thread-local stack is enough even when flows hop between runtime workers.

use std::cell::RefCell;

type CommitHook = Box<dyn FnOnce(&'static str, &[String])>;

struct Frame {
    name: &'static str,
    writes: Vec<String>,
    hooks: Vec<(usize, CommitHook)>,
}

thread_local! {
    static STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

/// Name of the innermost running action, if any.
pub fn current() -> Option<&'static str> {
    STACK.with(|stack| stack.borrow().last().map(|frame| frame.name))
}

/// Number of actions running on this thread.
pub(crate) fn depth() -> usize {
    STACK.with(|stack| stack.borrow().len())
}

pub(crate) fn record_write(path: &str) {
    STACK.with(|stack| {
        if let Some(frame) = stack.borrow_mut().last_mut() {
            frame.writes.push(path.to_string());
        }
    });
}

/// Run `hook` after the outermost running action returns, with that action's
/// name and every path written under it.
///
/// Only the first hook registered under `key` is kept. Does nothing when no
/// action is running; hooks are dropped if the action panics.
pub(crate) fn on_commit(key: usize, hook: impl FnOnce(&'static str, &[String]) + 'static) {
    STACK.with(|stack| {
        if let Some(root) = stack.borrow_mut().first_mut() {
            if !root.hooks.iter().any(|(registered, _)| *registered == key) {
                root.hooks.push((key, Box::new(hook)));
            }
        }
    });
}

/// Run `f` as the action `name`.
///
/// Nested actions fold their writes into the enclosing one. The frame is
/// popped even if `f` panics. Commit hooks run once the outermost frame is
/// gone, so they may start new actions.
pub fn run<R>(name: &'static str, f: impl FnOnce() -> R) -> R {
    STACK.with(|stack| {
        stack.borrow_mut().push(Frame {
            name,
            writes: Vec::new(),
            hooks: Vec::new(),
        })
    });

    let value = {
        let _unwind = scopeguard::guard_on_unwind((), |()| {
            STACK.with(|stack| {
                stack.borrow_mut().pop();
            });
        });
        f()
    };

    let root = STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        let frame = stack.pop()?;
        match stack.last_mut() {
            Some(parent) => {
                parent.writes.extend(frame.writes);
                None
            }
            None => Some(frame),
        }
    });

    if let Some(root) = root {
        for (_, hook) in root.hooks {
            hook(root.name, &root.writes);
        }
    }
    value
}
