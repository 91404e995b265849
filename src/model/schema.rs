//! Enumerated field types of the question schema.

use serde::{Deserialize, Serialize};

use super::error::ModelError;

/// A closed set of string values accepted by a schema field.
pub trait Enumeration: Sized + Copy + PartialEq + 'static {
    /// Every accepted value, in declaration order.
    const VALUES: &'static [Self];

    fn as_str(self) -> &'static str;

    /// Parse a raw snapshot value for `node.field`.
    ///
    /// Comparison is exact; `"Boolean"` is not `"boolean"`.
    fn parse(node: &'static str, field: &str, raw: &str) -> Result<Self, ModelError> {
        Self::VALUES
            .iter()
            .copied()
            .find(|value| value.as_str() == raw)
            .ok_or_else(|| ModelError::Validation {
                node,
                field: field.to_string(),
                value: format!("{:?}", raw),
                expected: format!(
                    "one of [{}]",
                    Self::VALUES
                        .iter()
                        .map(|value| value.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            })
    }
}

/// Answer format of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Multiple,
    Boolean,
}

impl Enumeration for QuestionType {
    const VALUES: &'static [Self] = &[QuestionType::Multiple, QuestionType::Boolean];

    fn as_str(self) -> &'static str {
        match self {
            QuestionType::Multiple => "multiple",
            QuestionType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Enumeration for Difficulty {
    const VALUES: &'static [Self] = &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
