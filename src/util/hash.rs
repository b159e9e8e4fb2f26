//! Content hashing.
//!
//! Downstream consumers may cache on the generated header's content, so the
//! build report carries a digest of the bytes that were written.

use sha2::{Digest, Sha256};

/// Compute the SHA256 digest of a byte slice as lowercase hex.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256_bytes(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_sha256_is_deterministic() {
        let header = b"#pragma once\nvoid bdd_free(void *f);\n";
        assert_eq!(sha256_bytes(header), sha256_bytes(header));
    }
}
