//! Restore error types.

use thiserror::Error;

/// Errors produced while reconstructing records from a revision history.
#[derive(Debug, Error)]
pub enum Error {
    /// A revision entry is missing required metadata.
    #[error("malformed revision: {0}")]
    MalformedRevision(String),

    /// The revision listing could not be obtained from the backing store.
    #[error("revision store unavailable: {0}")]
    StoreUnavailable(String),

    /// The body payload for one key could not be fetched.
    #[error("body fetch failed for '{key}': {reason}")]
    BodyFetch {
        /// The logical key whose body fetch failed.
        key: String,
        /// What the backing store reported.
        reason: String,
    },

    /// A reconstructed record could not be written to the destination.
    #[error("destination write failed for '{key}': {reason}")]
    DestinationWrite {
        /// The logical key whose write failed.
        key: String,
        /// What the destination reported.
        reason: String,
    },
}

impl Error {
    /// Whether this error aborts the whole restore.
    ///
    /// Malformed metadata and a missing listing leave nothing to reconstruct
    /// from; per-key fetch and write failures are isolated to their key.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MalformedRevision(_) | Error::StoreUnavailable(_)
        )
    }
}
