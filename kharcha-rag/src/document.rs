//! Data types for knowledge documents and retrieval results.

use serde::{Deserialize, Serialize};

/// A category-tagged advice passage, one unit of the retrieval corpus.
///
/// Documents are immutable after construction; the full corpus is fixed at
/// initialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeDocument {
    /// Short category label (e.g. "Food", "General").
    pub category: String,
    /// The advice text.
    pub content: String,
}

impl KnowledgeDocument {
    /// Create a new knowledge document.
    pub fn new(category: impl Into<String>, content: impl Into<String>) -> Self {
        Self { category: category.into(), content: content.into() }
    }
}

/// A retrieved [`KnowledgeDocument`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedDocument {
    /// The retrieved document.
    pub document: KnowledgeDocument,
    /// Cosine similarity to the query. Always strictly positive in
    /// retrieval results; zero-overlap documents are dropped.
    pub score: f32,
}
