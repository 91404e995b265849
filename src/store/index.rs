//! Identifier-keyed collections.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::{ModelError, Question};

/// A node with an immutable identifier.
pub trait Identified {
    fn identifier(&self) -> &str;
}

impl Identified for Question {
    fn identifier(&self) -> &str {
        self.id()
    }
}

/// Ordered collection that rejects duplicate identifiers.
#[derive(Debug)]
pub struct IdentityIndex<N> {
    collection: &'static str,
    nodes: Vec<Arc<N>>,
    positions: HashMap<String, usize>,
}

impl<N: Identified> IdentityIndex<N> {
    /// Empty index; `collection` names it in error messages.
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            nodes: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Append `node`.
    ///
    /// # Errors
    /// Returns [`ModelError::DuplicateIdentifier`] if the identifier is taken;
    /// the index is unchanged.
    pub fn register(&mut self, node: Arc<N>) -> Result<(), ModelError> {
        let id = node.identifier();
        if self.positions.contains_key(id) {
            return Err(ModelError::DuplicateIdentifier {
                collection: self.collection,
                id: id.to_string(),
            });
        }
        self.positions.insert(id.to_string(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&Arc<N>> {
        self.positions.get(id).map(|&position| &self.nodes[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn nodes(&self) -> &[Arc<N>] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<N>> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
