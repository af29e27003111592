//! The restore orchestrator: the core's single public entry point.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::index::RevisionIndex;
use crate::materialize::materialize;
use crate::revision::RecordSnapshot;
use crate::select::select_as_of;
use crate::store::{BodyFetch, RevisionListing};

/// Default bound on concurrent body fetches.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Options for one restore invocation.
#[derive(Debug, Clone, Copy)]
pub struct RestoreOptions {
    /// Reconstruct the state as of this instant (inclusive); `None` restores
    /// to the latest revision of every key.
    pub cutoff: Option<DateTime<Utc>>,
    /// Maximum body fetches in flight at once, to stay under the backing
    /// store's rate limits. Values below 1 are treated as 1.
    pub max_in_flight: usize,
}

impl RestoreOptions {
    /// Restore to latest with the default fetch bound.
    pub fn latest() -> Self {
        Self::default()
    }

    /// Restore to the state as of `cutoff`.
    pub fn as_of(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff: Some(cutoff),
            ..Self::default()
        }
    }

    /// Set the bound on concurrent body fetches.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            cutoff: None,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// A per-key materialization failure surfaced alongside the partial result.
#[derive(Debug)]
pub struct KeyFailure {
    /// The key whose snapshot could not be materialized.
    pub key: String,
    /// What went wrong for this key.
    pub error: Error,
}

/// The outcome of one restore invocation.
///
/// `records` holds one snapshot per key that had at least one qualifying
/// revision; keys whose earliest revision postdates the cutoff are absent.
/// `failures` lists keys whose body fetch failed; their absence from
/// `records` does not mean they did not exist.
#[derive(Debug, Default)]
pub struct RestoreReport {
    /// Reconstructed records, keyed by logical key.
    pub records: BTreeMap<String, RecordSnapshot>,
    /// Keys that failed to materialize, in completion order.
    pub failures: Vec<KeyFailure>,
}

impl RestoreReport {
    /// Whether every selected key materialized successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives indexing, selection, and materialization over a full revision
/// history to reconstruct the record set as of a point in time.
///
/// Body fetches for different keys are independent and run concurrently,
/// bounded by [`RestoreOptions::max_in_flight`]. Dropping the future
/// returned by [`Restorer::restore`] abandons in-flight fetches; no partial
/// state escapes because the report is assembled on the calling task.
pub struct Restorer<S> {
    store: Arc<S>,
}

impl<S> Restorer<S>
where
    S: RevisionListing + BodyFetch,
{
    /// Create a restorer over a backing store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reconstruct the record set as of `options.cutoff`.
    ///
    /// Fails outright only when the restore cannot start: the listing was
    /// unobtainable ([`Error::StoreUnavailable`]) or contained malformed
    /// entries ([`Error::MalformedRevision`]). Per-key fetch failures are
    /// isolated into [`RestoreReport::failures`]; the successful keys are
    /// always returned.
    pub async fn restore(&self, options: RestoreOptions) -> Result<RestoreReport, Error> {
        let listing = self.store.list_revisions().await?;
        debug!(revisions = listing.len(), "obtained revision listing");

        let index = RevisionIndex::build(listing)?;
        info!(
            keys = index.len(),
            cutoff = ?options.cutoff,
            "reconstructing records"
        );

        let store = self.store.as_ref();
        let winners = index
            .iter()
            .filter_map(|(_, revisions)| select_as_of(revisions, options.cutoff));

        let outcomes = stream::iter(winners.map(|winner| async move {
            (winner.key.clone(), materialize(store, winner).await)
        }))
        .buffer_unordered(options.max_in_flight.max(1))
        .collect::<Vec<_>>()
        .await;

        let mut report = RestoreReport::default();
        for (key, outcome) in outcomes {
            match outcome {
                Ok(snapshot) => {
                    report.records.insert(key, snapshot);
                }
                Err(error) => {
                    warn!(key = %key, %error, "record failed to materialize");
                    report.failures.push(KeyFailure { key, error });
                }
            }
        }

        info!(
            restored = report.records.len(),
            failed = report.failures.len(),
            "restore finished"
        );
        Ok(report)
    }
}
