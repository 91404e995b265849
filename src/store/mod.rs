//! Question store: collection, actions and flows.

mod flow;
mod index;
mod state;

pub use flow::FetchOutcome;
pub use index::{Identified, IdentityIndex};
pub use state::{Environment, QuestionStore, WeakQuestionStore};
