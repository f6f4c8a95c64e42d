//! Content hashing for duplicate-import detection.

use sha2::{Digest, Sha256};

/// SHA-256 of the given bytes, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash() {
        // Known SHA-256 hash for "Hello, World!"
        assert_eq!(
            content_hash(b"Hello, World!"),
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }

    #[test]
    fn test_content_hash_differs() {
        assert_ne!(content_hash(b"a,b\n1,2\n"), content_hash(b"a,b\n1,3\n"));
        assert_eq!(content_hash(b"").len(), 64);
    }
}
