//! Schema and instance model.

mod error;
mod question;
mod schema;
pub mod snapshot;

pub use error::ModelError;
pub use question::Question;
pub use schema::{Difficulty, Enumeration, QuestionType};
pub use snapshot::{Node, QuestionSnapshot, StoreSnapshot};
