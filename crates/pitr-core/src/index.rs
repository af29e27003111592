//! Per-key grouping of the flat revision listing.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::revision::Revision;

/// Revision histories grouped by logical key.
///
/// Built once per restore invocation from the raw listing, which may
/// interleave keys in any order. Each key's sequence is sorted by
/// `modified_at` descending (most recent first); the sort is stable, so
/// revisions the store listed with equal timestamps keep their listing
/// order. Nothing is dropped or deduplicated, delete markers included.
#[derive(Debug, Default)]
pub struct RevisionIndex {
    by_key: BTreeMap<String, Vec<Revision>>,
}

impl RevisionIndex {
    /// Group a raw revision listing into per-key descending sequences.
    ///
    /// Fails with [`Error::MalformedRevision`] when an entry has an empty
    /// key or version id.
    pub fn build(revisions: Vec<Revision>) -> Result<Self, Error> {
        let mut by_key: BTreeMap<String, Vec<Revision>> = BTreeMap::new();

        for revision in revisions {
            if revision.key.is_empty() {
                return Err(Error::MalformedRevision(
                    "revision entry with empty key".to_string(),
                ));
            }
            if revision.version_id.is_empty() {
                return Err(Error::MalformedRevision(format!(
                    "revision of '{}' with empty version id",
                    revision.key
                )));
            }
            by_key
                .entry(revision.key.clone())
                .or_default()
                .push(revision);
        }

        for sequence in by_key.values_mut() {
            sequence.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        }

        Ok(Self { by_key })
    }

    /// The revision history of one key, most recent first.
    pub fn revisions(&self, key: &str) -> Option<&[Revision]> {
        self.by_key.get(key).map(Vec::as_slice)
    }

    /// Iterate over every key and its descending revision sequence.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Revision])> {
        self.by_key
            .iter()
            .map(|(key, sequence)| (key.as_str(), sequence.as_slice()))
    }

    /// Number of distinct keys in the index.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the listing contained no revisions at all.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_groups_interleaved_keys() {
        let index = RevisionIndex::build(vec![
            Revision::write("a", "a1", at(1, 0)),
            Revision::write("b", "b1", at(2, 0)),
            Revision::write("a", "a2", at(3, 0)),
            Revision::delete_marker("b", "b2", at(4, 0)),
        ])
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.revisions("a").unwrap().len(), 2);
        assert_eq!(index.revisions("b").unwrap().len(), 2);
        assert!(index.revisions("c").is_none());
    }

    #[test]
    fn test_sequences_are_descending() {
        let index = RevisionIndex::build(vec![
            Revision::write("a", "oldest", at(1, 0)),
            Revision::write("a", "newest", at(9, 0)),
            Revision::write("a", "middle", at(5, 0)),
        ])
        .unwrap();

        let ids: Vec<&str> = index
            .revisions("a")
            .unwrap()
            .iter()
            .map(|r| r.version_id.as_str())
            .collect();
        assert_eq!(ids, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_order_invariant_to_input_order() {
        let forward = vec![
            Revision::write("a", "a1", at(1, 0)),
            Revision::write("b", "b1", at(2, 0)),
            Revision::write("a", "a2", at(3, 0)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let from_forward = RevisionIndex::build(forward).unwrap();
        let from_reversed = RevisionIndex::build(reversed).unwrap();

        assert_eq!(
            from_forward.revisions("a").unwrap(),
            from_reversed.revisions("a").unwrap()
        );
        assert_eq!(
            from_forward.revisions("b").unwrap(),
            from_reversed.revisions("b").unwrap()
        );
    }

    #[test]
    fn test_equal_timestamps_keep_listing_order() {
        // The store's listing order is the tie-break; the stable sort must
        // not reorder revisions with equal timestamps.
        let index = RevisionIndex::build(vec![
            Revision::write("a", "first-listed", at(5, 0)),
            Revision::write("a", "second-listed", at(5, 0)),
        ])
        .unwrap();

        let ids: Vec<&str> = index
            .revisions("a")
            .unwrap()
            .iter()
            .map(|r| r.version_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first-listed", "second-listed"]);
    }

    #[test]
    fn test_delete_markers_are_kept() {
        let index = RevisionIndex::build(vec![
            Revision::write("a", "a1", at(1, 0)),
            Revision::delete_marker("a", "a2", at(2, 0)),
        ])
        .unwrap();
        assert_eq!(index.revisions("a").unwrap().len(), 2);
        assert!(index.revisions("a").unwrap()[0].is_delete_marker);
    }

    #[test]
    fn test_empty_key_is_malformed() {
        let result = RevisionIndex::build(vec![Revision::write("", "v1", at(1, 0))]);
        assert!(matches!(result, Err(Error::MalformedRevision(_))));
    }

    #[test]
    fn test_empty_version_id_is_malformed() {
        let result = RevisionIndex::build(vec![Revision::write("a", "", at(1, 0))]);
        assert!(matches!(result, Err(Error::MalformedRevision(_))));
    }

    #[test]
    fn test_empty_listing() {
        let index = RevisionIndex::build(Vec::new()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
