//! Observable state container for a trivia quiz.
//!
//! A [`QuestionStore`](store::QuestionStore) owns an ordered, identifier-keyed
//! collection of [`Question`](model::Question) nodes. Reads go through
//! tracked cells and memoized views; writes only happen inside named
//! actions (`set_guess`, `replace_questions`, `apply_snapshot`) or the
//! `fetch_questions` flow, which awaits the injected question service and
//! then commits through an action.

pub mod config;
pub mod logging;
pub mod model;
pub mod services;
pub mod store;
pub mod tree;
