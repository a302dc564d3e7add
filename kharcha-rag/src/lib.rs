//! Retrieval-Augmented Generation core for Kharcha expense advice.
//!
//! This crate provides:
//! - [`KnowledgeBase`] — the fixed financial-advice corpus with category lookup
//! - [`Retriever`] — TF-IDF document ranking by cosine similarity
//! - [`AdvicePipeline`] — retrieval plus prompt assembly for an external
//!   generation collaborator
//!
//! Retrieval is bag-of-words exact-term matching over a stopworded
//! vocabulary: a query matches a document only through shared surface
//! tokens, so synonyms do not match. For a small fixed corpus this trades
//! recall for precision and full determinism; it is not semantic search.
//!
//! The crate performs no I/O of its own. It hands a single prompt string to
//! whatever generation client the application wires up, and expects a
//! single string reply in return.

pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod knowledge;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
mod stopwords;
pub mod vectorizer;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{KnowledgeDocument, RetrievedDocument};
pub use error::{RagError, Result};
pub use knowledge::{GENERAL_CATEGORY, KnowledgeBase, NO_ADVICE};
pub use pipeline::{AdvicePipeline, AdvicePipelineBuilder, EnhancedPrompt};
pub use retriever::{DEFAULT_RETRIEVAL_TOP_K, Retriever};
pub use vectorizer::TfidfVectorizer;
