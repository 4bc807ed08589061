//! Input fingerprints for cache keys.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint of a serializable value's JSON form, truncated to 16 hex digits.
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut digest = calculate_checksum(&json);
    digest.truncate(16);
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_consistency() {
        let content = r#"{"test": "data"}"#;
        assert_eq!(calculate_checksum(content), calculate_checksum(content));
        assert_eq!(calculate_checksum(content).len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_values() {
        let a = fingerprint(&[1, 2, 3]).unwrap();
        let b = fingerprint(&[1, 2, 4]).unwrap();
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
        assert_eq!(a, fingerprint(&vec![1, 2, 3]).unwrap());
    }
}
