//! Question service boundary.
//!
//! The store only consumes this contract; transports live elsewhere.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::QuestionSnapshot;

/// Tag of a failed `get_questions` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProblemKind {
    Timeout,
    CannotConnect,
    Server,
    Unauthorized,
    Forbidden,
    NotFound,
    Rejected,
    Unknown,
    BadData,
    /// Any tag the store does not know about.
    Other(String),
}

impl ProblemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ProblemKind::Timeout => "timeout",
            ProblemKind::CannotConnect => "cannot-connect",
            ProblemKind::Server => "server",
            ProblemKind::Unauthorized => "unauthorized",
            ProblemKind::Forbidden => "forbidden",
            ProblemKind::NotFound => "not-found",
            ProblemKind::Rejected => "rejected",
            ProblemKind::Unknown => "unknown",
            ProblemKind::BadData => "bad-data",
            ProblemKind::Other(tag) => tag,
        }
    }

    /// Whether retrying later might succeed.
    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            ProblemKind::Timeout | ProblemKind::CannotConnect | ProblemKind::Unknown
        )
    }
}

impl From<&str> for ProblemKind {
    fn from(tag: &str) -> Self {
        match tag {
            "timeout" => ProblemKind::Timeout,
            "cannot-connect" => ProblemKind::CannotConnect,
            "server" => ProblemKind::Server,
            "unauthorized" => ProblemKind::Unauthorized,
            "forbidden" => ProblemKind::Forbidden,
            "not-found" => ProblemKind::NotFound,
            "rejected" => ProblemKind::Rejected,
            "unknown" => ProblemKind::Unknown,
            "bad-data" => ProblemKind::BadData,
            other => ProblemKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged result of `get_questions`.
///
/// Serializes as `{"kind": "ok", "questions": [...]}` or `{"kind": "<tag>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawResult", into = "RawResult")]
pub enum GetQuestionsResult {
    Ok { questions: Vec<QuestionSnapshot> },
    Problem(ProblemKind),
}

impl GetQuestionsResult {
    pub fn kind(&self) -> &str {
        match self {
            GetQuestionsResult::Ok { .. } => "ok",
            GetQuestionsResult::Problem(problem) => problem.as_str(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawResult {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    questions: Option<Vec<QuestionSnapshot>>,
}

impl From<RawResult> for GetQuestionsResult {
    fn from(raw: RawResult) -> Self {
        if raw.kind == "ok" {
            GetQuestionsResult::Ok {
                questions: raw.questions.unwrap_or_default(),
            }
        } else {
            GetQuestionsResult::Problem(ProblemKind::from(raw.kind.as_str()))
        }
    }
}

impl From<GetQuestionsResult> for RawResult {
    fn from(result: GetQuestionsResult) -> Self {
        match result {
            GetQuestionsResult::Ok { questions } => RawResult {
                kind: "ok".to_string(),
                questions: Some(questions),
            },
            GetQuestionsResult::Problem(problem) => RawResult {
                kind: problem.as_str().to_string(),
                questions: None,
            },
        }
    }
}

/// Source of trivia questions.
#[async_trait]
pub trait QuestionApi: Send + Sync {
    /// Fetch a batch of question snapshots.
    ///
    /// Failures are reported in the result, never as a panic or error.
    async fn get_questions(&self) -> GetQuestionsResult;
}

/// Serves a `GetQuestionsResult` stored as JSON on disk.
pub struct FixtureApi {
    path: PathBuf,
}

impl FixtureApi {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionApi for FixtureApi {
    async fn get_questions(&self) -> GetQuestionsResult {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "Failed to read question fixture");
                return GetQuestionsResult::Problem(ProblemKind::CannotConnect);
            }
        };

        match serde_json::from_str(&content) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(path = %self.path.display(), error = %err, "Malformed question fixture");
                GetQuestionsResult::Problem(ProblemKind::BadData)
            }
        }
    }
}
