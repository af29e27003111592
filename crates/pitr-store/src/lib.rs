//! PITR Store - Revision histories over generic object storage.
//!
//! Implements the backing-store collaborators of `pitr-core` on top of the
//! `object_store` abstraction (S3, local filesystem, in-memory): writes
//! append one immutable object per revision, and the restore side lists and
//! fetches them back.

pub mod path;
pub mod versioned;

pub use path::{decode_version_id, encode_version_id, DELETE_EXTENSION, PUT_EXTENSION};
pub use versioned::VersionedObjectStore;
