//! Error types for the `ragline` crate.

use thiserror::Error;

/// Errors that can occur in pipeline operations.
///
/// Every failure aborts the flow it occurred in and propagates to the caller;
/// there is no local recovery or retry at this layer.
#[derive(Debug, Error)]
pub enum RagError {
    /// A document source could not be read or has an unsupported format.
    #[error("Load error ({source_path}): {message}")]
    Load {
        /// The path of the source that failed to load.
        source_path: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding collaborator was unreachable or returned malformed output.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector index rejected or failed a write.
    #[error("Index write error ({backend}): {message}")]
    IndexWrite {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector index was unreachable, missing, or returned no results.
    #[error("Index query error ({backend}): {message}")]
    IndexQuery {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The language model was unreachable or returned no output.
    #[error("Generation error ({model}): {message}")]
    Generation {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration or template validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RagError>;
