//! Error types for the `kharcha-rag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval operations.
///
/// Retrieval itself never fails: empty corpora, empty queries, and unknown
/// categories all yield empty or sentinel values. The only fallible path is
/// configuration and pipeline construction.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
