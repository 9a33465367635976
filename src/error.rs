//! Error types for the hstore column wrapper.
//!
//! The wrapper is deliberately loose: malformed domain data (unparsable
//! numbers, dates, pair items) degrades to zero values and is never surfaced
//! as an error. The only hard failure lives at the serialization boundary,
//! where an unsupported raw cell representation indicates an integration bug
//! rather than bad data.

use thiserror::Error;

/// Errors surfaced by the hstore wrapper.
#[derive(Debug, Error)]
pub enum HstoreError {
    /// The database driver handed the scan hook a cell representation the
    /// column cannot decode (e.g. a byte sequence that is not valid UTF-8).
    #[error("unsupported source for hstore scan: {reason}")]
    UnsupportedSource {
        /// What made the source undecodable.
        reason: String,
    },
}

impl HstoreError {
    /// Create an UnsupportedSource error.
    pub fn unsupported_source(reason: impl Into<String>) -> Self {
        HstoreError::UnsupportedSource {
            reason: reason.into(),
        }
    }
}

/// Result type alias for hstore operations.
pub type Result<T> = std::result::Result<T, HstoreError>;
