//! Point-in-time winner selection.

use chrono::{DateTime, Utc};

use crate::revision::Revision;

/// Select the revision that is current as of `cutoff` from one key's
/// descending-ordered history.
///
/// Without a cutoff the most recent revision wins, delete markers included
/// (restore-to-latest). With a cutoff the winner is the first revision at or
/// before it; "as of" is inclusive, so a revision stamped exactly at the
/// cutoff qualifies. Returns `None` when the key's earliest revision is
/// still later than the cutoff, i.e. the key did not exist yet.
///
/// Revisions with equal timestamps arrive already tie-broken by the index's
/// stable sort; no further tie-breaking happens here.
pub fn select_as_of<'a>(
    revisions: &'a [Revision],
    cutoff: Option<DateTime<Utc>>,
) -> Option<&'a Revision> {
    match cutoff {
        None => revisions.first(),
        Some(cutoff) => revisions
            .iter()
            .find(|revision| revision.modified_at <= cutoff),
    }
}
