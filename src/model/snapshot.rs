//! Snapshot codec: plain, serializable values for tree nodes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ModelError;

/// Plain field state of a `Question`.
///
/// Enumerated fields stay raw strings here; they are checked when a node is
/// created from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSnapshot {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
    #[serde(default)]
    pub guess: String,
}

/// Plain field state of a whole `QuestionStore`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub questions: Vec<QuestionSnapshot>,
}

/// A node type that can be built from, and reduced to, a snapshot.
pub trait Node: Sized {
    /// Type name used in error messages.
    const NAME: &'static str;
    /// Fields a plain value must carry (non-null) to be decoded.
    const REQUIRED: &'static [&'static str];

    type Snapshot: Clone + PartialEq + Serialize + DeserializeOwned;

    /// Validate `snapshot` and build a fresh node.
    fn create(snapshot: Self::Snapshot) -> Result<Self, ModelError>;

    /// Current declared field values; never includes derived views.
    fn snapshot(&self) -> Self::Snapshot;
}

pub fn to_snapshot<N: Node>(node: &N) -> N::Snapshot {
    node.snapshot()
}

pub fn from_snapshot<N: Node>(snapshot: N::Snapshot) -> Result<N, ModelError> {
    N::create(snapshot)
}

/// Build a node from an untyped plain value, e.g. parsed JSON.
pub fn from_value<N: Node>(value: Value) -> Result<N, ModelError> {
    let Value::Object(fields) = &value else {
        return Err(ModelError::Validation {
            node: N::NAME,
            field: "(snapshot)".to_string(),
            value: value.to_string(),
            expected: "an object".to_string(),
        });
    };

    for field in N::REQUIRED {
        match fields.get(*field) {
            None => return Err(ModelError::missing(N::NAME, field, "undefined")),
            Some(Value::Null) => return Err(ModelError::missing(N::NAME, field, "null")),
            Some(_) => {}
        }
    }

    let snapshot: N::Snapshot =
        serde_json::from_value(value).map_err(|err| ModelError::Validation {
            node: N::NAME,
            field: "(snapshot)".to_string(),
            value: err.to_string(),
            expected: "a well-formed snapshot".to_string(),
        })?;
    N::create(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot: QuestionSnapshot = serde_json::from_value(json!({
            "id": "1",
            "type": "boolean",
            "difficulty": "easy",
            "question": "2+2=4?",
            "correctAnswer": "True",
            "incorrectAnswers": ["False"]
        }))
        .unwrap();

        assert_eq!(snapshot.kind, "boolean");
        assert_eq!(snapshot.category, None);
        assert_eq!(snapshot.guess, "");

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["correctAnswer"], "True");
        assert_eq!(value["guess"], "");
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_store_snapshot_defaults_to_empty() {
        let snapshot: StoreSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.questions.is_empty());
    }
}
