//! Revision and snapshot types.
//!
//! A [`Revision`] is one historical write event for a logical key; a
//! [`RecordSnapshot`] is the reconstructed state of that key as of the
//! requested instant. Revisions are immutable once listed; snapshots are
//! created fresh per restore invocation.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// One historical write event for a logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// The logical record identifier.
    pub key: String,
    /// Opaque identifier for fetching this revision's body, unique within
    /// the key's history.
    pub version_id: String,
    /// When the write was committed.
    pub modified_at: DateTime<Utc>,
    /// True when this revision records a deletion rather than a body.
    pub is_delete_marker: bool,
}

impl Revision {
    /// A revision that recorded a body write.
    pub fn write(
        key: impl Into<String>,
        version_id: impl Into<String>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            version_id: version_id.into(),
            modified_at,
            is_delete_marker: false,
        }
    }

    /// A revision that recorded a deletion.
    pub fn delete_marker(
        key: impl Into<String>,
        version_id: impl Into<String>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            version_id: version_id.into(),
            modified_at,
            is_delete_marker: true,
        }
    }
}

/// The reconstructed state of one key as of the requested instant.
///
/// Exactly one of the two optional fields is populated: a document carries a
/// `body`, a tombstone carries `deleted_marker = Some(true)`. The marker is
/// absent (never `Some(false)`) on documents so consumers can distinguish
/// "restored as present" from "never restored".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    /// Same identity as the source revision's key.
    pub key: String,
    /// The fetched payload; present only when the winning revision was a
    /// body write.
    pub body: Option<Bytes>,
    /// Present and true only when the winning revision was a delete marker.
    pub deleted_marker: Option<bool>,
}

impl RecordSnapshot {
    /// A snapshot of a record that existed with this body.
    pub fn document(key: impl Into<String>, body: Bytes) -> Self {
        Self {
            key: key.into(),
            body: Some(body),
            deleted_marker: None,
        }
    }

    /// A tombstone: the record was deleted as of the requested instant.
    pub fn tombstone(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: None,
            deleted_marker: Some(true),
        }
    }

    /// Whether this snapshot is a deletion tombstone.
    pub fn is_deleted(&self) -> bool {
        self.deleted_marker == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_document_snapshot_shape() {
        let snapshot = RecordSnapshot::document("user-1", Bytes::from_static(b"{}"));
        assert_eq!(snapshot.body.as_deref(), Some(&b"{}"[..]));
        assert_eq!(snapshot.deleted_marker, None);
        assert!(!snapshot.is_deleted());
    }

    #[test]
    fn test_tombstone_snapshot_shape() {
        let snapshot = RecordSnapshot::tombstone("user-1");
        assert_eq!(snapshot.body, None);
        assert_eq!(snapshot.deleted_marker, Some(true));
        assert!(snapshot.is_deleted());
    }

    #[test]
    fn test_revision_constructors() {
        let at = Utc.with_ymd_and_hms(2016, 3, 28, 23, 56, 35).unwrap();
        let write = Revision::write("user-1", "v1", at);
        assert!(!write.is_delete_marker);
        let delete = Revision::delete_marker("user-1", "v2", at);
        assert!(delete.is_delete_marker);
    }
}
