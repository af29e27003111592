//! Collaborator interfaces at the backing-store and destination boundaries.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Error;
use crate::revision::{RecordSnapshot, Revision};

/// Enumerates revision metadata from the backing store.
///
/// Implementations must return every version of every object, delete
/// markers included; the index re-sorts, so listing order only matters as
/// the tie-break for equal timestamps.
#[async_trait]
pub trait RevisionListing: Send + Sync {
    /// The full revision listing, or [`Error::StoreUnavailable`] when it
    /// cannot be obtained.
    async fn list_revisions(&self) -> Result<Vec<Revision>, Error>;
}

/// Fetches one revision's body payload from the backing store.
#[async_trait]
pub trait BodyFetch: Send + Sync {
    /// The payload stored for `(key, version_id)`, or [`Error::BodyFetch`]
    /// when it cannot be fetched (e.g. the version was purged out from under
    /// a concurrent restore).
    async fn fetch_body(&self, key: &str, version_id: &str) -> Result<Bytes, Error>;
}

/// Writes reconstructed records into a destination document store.
///
/// Consumed by embedders of the core; writes must be idempotent per key.
#[async_trait]
pub trait DestinationWriter: Send + Sync {
    /// Persist one key's snapshot.
    async fn write(&self, key: &str, snapshot: &RecordSnapshot) -> Result<(), Error>;
}
