//! A revision history laid out over a generic object store.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use object_store::path::Path;
use object_store::ObjectStore;
use tracing::debug;

use pitr_core::{BodyFetch, Error, Revision, RevisionListing};

use crate::path::{decode_version_id, encode_version_id};

/// An append-only revision history stored one object per write.
///
/// Objects live at `{prefix}/{key}/{version_id}`; the version id encodes
/// the commit instant and deletion flag (see [`crate::path`]), so the
/// listing alone yields full revision metadata without a GET per version.
/// Delete markers are zero-length objects. Existing objects are never
/// rewritten; a new write of a key appends a new version.
pub struct VersionedObjectStore {
    store: Arc<dyn ObjectStore>,
    prefix: Path,
}

impl VersionedObjectStore {
    /// Wrap an object store, rooting all revisions under `prefix`.
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl AsRef<str>) -> Self {
        Self {
            store,
            prefix: Path::from(prefix.as_ref()),
        }
    }

    /// Append a body write for `key`, committed now.
    pub async fn record_put(&self, key: &str, body: Bytes) -> Result<Revision, Error> {
        self.record_put_at(key, body, Utc::now()).await
    }

    /// Append a body write for `key` with an explicit commit instant
    /// (backfills and imports).
    pub async fn record_put_at(
        &self,
        key: &str,
        body: Bytes,
        modified_at: DateTime<Utc>,
    ) -> Result<Revision, Error> {
        let revision = self.new_revision(key, modified_at, false)?;
        let location = self.object_path(&revision.key, &revision.version_id);
        self.store
            .put(&location, body.into())
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        debug!(key = %revision.key, version = %revision.version_id, "recorded put");
        Ok(revision)
    }

    /// Append a delete marker for `key`, committed now.
    pub async fn record_delete(&self, key: &str) -> Result<Revision, Error> {
        self.record_delete_at(key, Utc::now()).await
    }

    /// Append a delete marker for `key` with an explicit commit instant.
    pub async fn record_delete_at(
        &self,
        key: &str,
        modified_at: DateTime<Utc>,
    ) -> Result<Revision, Error> {
        let revision = self.new_revision(key, modified_at, true)?;
        let location = self.object_path(&revision.key, &revision.version_id);
        self.store
            .put(&location, Bytes::new().into())
            .await
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
        debug!(key = %revision.key, version = %revision.version_id, "recorded delete marker");
        Ok(revision)
    }

    fn new_revision(
        &self,
        key: &str,
        modified_at: DateTime<Utc>,
        is_delete_marker: bool,
    ) -> Result<Revision, Error> {
        if key.is_empty() {
            return Err(Error::MalformedRevision("empty key".to_string()));
        }
        if key.contains('/') {
            return Err(Error::MalformedRevision(format!(
                "key '{key}' contains '/'"
            )));
        }
        let version_id = encode_version_id(modified_at, rand::random::<u32>(), is_delete_marker);
        Ok(if is_delete_marker {
            Revision::delete_marker(key, version_id, modified_at)
        } else {
            Revision::write(key, version_id, modified_at)
        })
    }

    fn object_path(&self, key: &str, version_id: &str) -> Path {
        self.prefix.child(key).child(version_id)
    }

    /// Parse one listed object location back into a revision.
    fn revision_from(&self, location: &Path) -> Result<Revision, Error> {
        let mut parts = location
            .prefix_match(&self.prefix)
            .ok_or_else(|| malformed_location(location))?;

        let key = parts.next().ok_or_else(|| malformed_location(location))?;
        let version_id = parts.next().ok_or_else(|| malformed_location(location))?;
        if parts.next().is_some() {
            return Err(malformed_location(location));
        }

        let key = key.as_ref().to_string();
        let version_id = version_id.as_ref().to_string();
        let (modified_at, is_delete_marker) = decode_version_id(&version_id)?;

        Ok(Revision {
            key,
            version_id,
            modified_at,
            is_delete_marker,
        })
    }
}

fn malformed_location(location: &Path) -> Error {
    Error::MalformedRevision(format!(
        "object at '{location}' is not a {{key}}/{{version_id}} revision"
    ))
}

#[async_trait]
impl RevisionListing for VersionedObjectStore {
    async fn list_revisions(&self) -> Result<Vec<Revision>, Error> {
        let mut entries = self.store.list(Some(&self.prefix));
        let mut revisions = Vec::new();
        loop {
            let meta = entries
                .try_next()
                .await
                .map_err(|e| Error::StoreUnavailable(e.to_string()))?;
            match meta {
                Some(meta) => revisions.push(self.revision_from(&meta.location)?),
                None => break,
            }
        }
        debug!(revisions = revisions.len(), prefix = %self.prefix, "listed revision history");
        Ok(revisions)
    }
}

#[async_trait]
impl BodyFetch for VersionedObjectStore {
    async fn fetch_body(&self, key: &str, version_id: &str) -> Result<Bytes, Error> {
        let location = self.object_path(key, version_id);
        let result = self
            .store
            .get(&location)
            .await
            .map_err(|e| Error::BodyFetch {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        result.bytes().await.map_err(|e| Error::BodyFetch {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}
