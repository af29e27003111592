//! Materializing a winning revision into a record snapshot.

use tracing::trace;

use crate::error::Error;
use crate::revision::{RecordSnapshot, Revision};
use crate::store::BodyFetch;

/// Turn a winning revision into the final record value.
///
/// Delete markers become tombstones without touching the backing store;
/// body writes fetch their payload through the collaborator. Fetch failures
/// are attributable to the one key and surface as [`Error::BodyFetch`].
pub async fn materialize<F>(fetcher: &F, winner: &Revision) -> Result<RecordSnapshot, Error>
where
    F: BodyFetch + ?Sized,
{
    if winner.is_delete_marker {
        trace!(key = %winner.key, version = %winner.version_id, "winner is a delete marker");
        return Ok(RecordSnapshot::tombstone(&winner.key));
    }

    trace!(key = %winner.key, version = %winner.version_id, "fetching winning body");
    let body = fetcher.fetch_body(&winner.key, &winner.version_id).await?;
    Ok(RecordSnapshot::document(&winner.key, body))
}
