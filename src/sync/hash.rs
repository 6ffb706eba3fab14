//! Content hashing for sync status.
//!
//! The sync gate itself compares raw bytes; hashes are for display,
//! letting `rowsync status` show at a glance whether a profile's local
//! and remote sides have drifted without printing either blob.

use sha2::{Digest, Sha256};

/// Compute a SHA256 hash of a text blob.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check whether two sides differ, given their hashes.
///
/// `None` means the side does not exist yet and always reads as changed
/// relative to an existing side.
#[must_use]
pub fn has_changed(local_hash: Option<&str>, remote_hash: Option<&str>) -> bool {
    match (local_hash, remote_hash) {
        (Some(l), Some(r)) => l != r,
        (None, None) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_deterministic() {
        let hash1 = content_hash("{\n  \"a\": 1\n}");
        let hash2 = content_hash("{\n  \"a\": 1\n}");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA256 produces 64 hex chars
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        assert_ne!(content_hash("a"), content_hash("b"));
    }

    #[test]
    fn test_has_changed() {
        let a = content_hash("a");
        let b = content_hash("b");
        assert!(!has_changed(Some(&a), Some(&a)));
        assert!(has_changed(Some(&a), Some(&b)));
        assert!(has_changed(Some(&a), None));
        assert!(has_changed(None, Some(&b)));
        assert!(!has_changed(None, None));
    }
}
