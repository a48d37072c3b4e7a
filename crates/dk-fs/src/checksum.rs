//! Content checksums
//!
//! A restored file is compared to the copy taken before modification by its
//! `sha256:<hex>` digest.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Digest of a file, streamed rather than read into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn compute_file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checksum_of(content: &[u8]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".bashrc");
        std::fs::write(&path, content).unwrap();
        compute_file_checksum(&path).unwrap()
    }

    #[test]
    fn empty_file() {
        assert_eq!(
            checksum_of(b""),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            checksum_of(b"hello world"),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(compute_file_checksum(&dir.path().join("absent")).is_err());
    }
}
