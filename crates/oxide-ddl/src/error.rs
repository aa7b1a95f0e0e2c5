//! Error types for DDL generation.

use std::path::PathBuf;

/// Errors that can occur while generating or reconciling DDL files.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// Invalid or conflicting configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The catalog could not answer a query.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A catalog lookup found no object with the given name.
    #[error("Object '{name}' not found in catalog")]
    ObjectNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// An object type name the generator does not know.
    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    /// A DDL file could not be written.
    #[error("Can't write ddl to file [{}]: {source}", path.display())]
    Write {
        /// Target file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A stale DDL file could not be deleted.
    #[error("Can't delete ddl file [{}]: {source}", path.display())]
    Delete {
        /// File scheduled for deletion.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Other IO error (listing directories, reading snapshots).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for DDL generation.
pub type Result<T> = std::result::Result<T, DdlError>;
