use thiserror::Error;

/// Errors raised while constructing or mutating the state tree.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// A snapshot field is missing, malformed or outside its enumeration.
    #[error("Invalid value for {node}.{field}: expected {expected}, received {value}")]
    Validation {
        node: &'static str,
        field: String,
        value: String,
        expected: String,
    },

    /// A cell was written while no action was running.
    #[error("Cannot modify '{path}' outside of an action")]
    IllegalMutation { path: String },

    /// Two nodes with the same identifier in one collection.
    #[error("Duplicate identifier '{id}' in {collection}")]
    DuplicateIdentifier {
        collection: &'static str,
        id: String,
    },
}

impl ModelError {
    pub(crate) fn missing(node: &'static str, field: &str, value: &str) -> Self {
        ModelError::Validation {
            node,
            field: field.to_string(),
            value: value.to_string(),
            expected: "a value".to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ModelError::Validation { .. })
    }

    /// Name of the offending field, for validation errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            ModelError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
