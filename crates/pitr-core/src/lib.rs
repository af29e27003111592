//! PITR Core - Point-in-time reconstruction of keyed records.
//!
//! Replays an append-only history of stored revisions to reconstruct the
//! record set that existed at an arbitrary instant: records that were later
//! deleted come back as tombstones, records that did not exist yet are
//! omitted. The backing object store and the destination document store sit
//! behind the traits in [`store`].

pub mod error;
pub mod index;
pub mod materialize;
pub mod restore;
pub mod revision;
pub mod select;
pub mod store;

pub use error::Error;
pub use index::RevisionIndex;
pub use materialize::materialize;
pub use restore::{
    KeyFailure, RestoreOptions, RestoreReport, Restorer, DEFAULT_MAX_IN_FLIGHT,
};
pub use revision::{RecordSnapshot, Revision};
pub use select::select_as_of;
pub use store::{BodyFetch, DestinationWriter, RevisionListing};
