//! Unified error type for the transcoding crates.
//!
//! Resolution itself never fails: "nothing to do" is expressed as `None`.
//! [`Error`] covers the layers around it: looking up named profiles, loading
//! definitions and reading configuration.

use std::fmt;

/// Unified error type covering all failure modes outside of resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "profile", "section").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// No profile set has been published yet.
    #[error("Profiles not loaded")]
    NotReady,

    /// Definition or configuration data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether this error means "not loaded yet" rather than a real failure.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Error::NotReady)
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
