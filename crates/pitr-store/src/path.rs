//! Version-id encoding.
//!
//! Generic object stores expose no versioned listing, so every write lands
//! as its own immutable object and the revision metadata rides in the
//! version id itself:
//!
//! ```text
//! {unix_millis:020}-{nonce:08x}.{put|del}
//! ```
//!
//! The millisecond timestamp is the commit instant, the random nonce keeps
//! ids unique when two writes of one key share a millisecond, and the
//! extension distinguishes body writes from delete markers.

use chrono::{DateTime, Utc};

use pitr_core::Error;

/// Extension marking a body write.
pub const PUT_EXTENSION: &str = "put";
/// Extension marking a delete marker.
pub const DELETE_EXTENSION: &str = "del";

/// Encode a commit instant and deletion flag into a version id.
pub fn encode_version_id(modified_at: DateTime<Utc>, nonce: u32, is_delete_marker: bool) -> String {
    let extension = if is_delete_marker {
        DELETE_EXTENSION
    } else {
        PUT_EXTENSION
    };
    format!(
        "{:020}-{:08x}.{}",
        modified_at.timestamp_millis(),
        nonce,
        extension
    )
}

/// Decode a version id back into its commit instant and deletion flag.
pub fn decode_version_id(version_id: &str) -> Result<(DateTime<Utc>, bool), Error> {
    let (stem, extension) = version_id
        .rsplit_once('.')
        .ok_or_else(|| malformed(version_id, "missing extension"))?;

    let is_delete_marker = match extension {
        PUT_EXTENSION => false,
        DELETE_EXTENSION => true,
        _ => return Err(malformed(version_id, "unknown extension")),
    };

    // Split the nonce off from the right: pre-epoch instants format with a
    // leading sign, so the millis field may itself start with '-'.
    let (millis, nonce) = stem
        .rsplit_once('-')
        .ok_or_else(|| malformed(version_id, "missing nonce"))?;
    if millis.is_empty() || nonce.is_empty() {
        return Err(malformed(version_id, "missing nonce"));
    }

    let millis: i64 = millis
        .parse()
        .map_err(|_| malformed(version_id, "unparseable timestamp"))?;
    let modified_at = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| malformed(version_id, "timestamp out of range"))?;

    Ok((modified_at, is_delete_marker))
}

fn malformed(version_id: &str, reason: &str) -> Error {
    Error::MalformedRevision(format!("version id '{version_id}': {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_trip_put() {
        let at = Utc.with_ymd_and_hms(2016, 3, 28, 23, 56, 35).unwrap();
        let id = encode_version_id(at, 0xdeadbeef, false);
        assert!(id.ends_with(".put"));

        let (decoded_at, is_delete_marker) = decode_version_id(&id).unwrap();
        assert_eq!(decoded_at, at);
        assert!(!is_delete_marker);
    }

    #[test]
    fn test_round_trip_delete_marker() {
        let at = Utc.with_ymd_and_hms(2016, 3, 29, 23, 56, 50).unwrap();
        let id = encode_version_id(at, 1, true);
        assert!(id.ends_with(".del"));

        let (decoded_at, is_delete_marker) = decode_version_id(&id).unwrap();
        assert_eq!(decoded_at, at);
        assert!(is_delete_marker);
    }

    #[test]
    fn test_pre_epoch_round_trip() {
        let at = Utc.timestamp_millis_opt(-1).unwrap();
        let id = encode_version_id(at, 7, false);

        let (decoded_at, is_delete_marker) = decode_version_id(&id).unwrap();
        assert_eq!(decoded_at, at);
        assert!(!is_delete_marker);
    }

    #[test]
    fn test_millisecond_precision_survives() {
        let at = Utc.timestamp_millis_opt(1_459_295_815_123).unwrap();
        let (decoded_at, _) = decode_version_id(&encode_version_id(at, 7, false)).unwrap();
        assert_eq!(decoded_at, at);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode_version_id("not-a-version-id").is_err());
        assert!(decode_version_id("00000000000000000001-ff.zip").is_err());
        assert!(decode_version_id("abc-ff.put").is_err());
        assert!(decode_version_id("123.put").is_err());
        assert!(decode_version_id("").is_err());
    }

    #[test]
    fn test_rejected_ids_are_malformed_revision() {
        assert!(matches!(
            decode_version_id("garbage"),
            Err(Error::MalformedRevision(_))
        ));
    }
}
