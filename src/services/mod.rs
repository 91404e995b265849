//! Boundaries consumed by the store: the question service and snapshot storage.

mod api;
mod storage;

pub use api::{FixtureApi, GetQuestionsResult, ProblemKind, QuestionApi};
pub use storage::{attach_autosave, hydrate, MemoryStorage, SnapshotStorage, StorageError};
