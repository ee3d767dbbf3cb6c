//! Checksum computation for repository indexes.
//!
//! Release files carry three checksum blocks (MD5, SHA-1, SHA-256). All
//! three digests are computed in a single read pass per file.

use crate::error::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use sha1::Digest as _;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The digest algorithms a Release file lists, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    /// MD5 hash algorithm.
    Md5,
    /// SHA-1 hash algorithm.
    Sha1,
    /// SHA-256 hash algorithm.
    Sha256,
}

impl ChecksumAlgorithm {
    /// Get the block tag used in Release files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "MD5Sum",
            ChecksumAlgorithm::Sha1 => "SHA1",
            ChecksumAlgorithm::Sha256 => "SHA256",
        }
    }

    /// All algorithms, in the order their blocks appear in a Release file.
    pub fn all() -> &'static [ChecksumAlgorithm] {
        &[
            ChecksumAlgorithm::Md5,
            ChecksumAlgorithm::Sha1,
            ChecksumAlgorithm::Sha256,
        ]
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three digests of a single file, as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChecksums {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

impl FileChecksums {
    /// Get a digest by algorithm.
    pub fn get(&self, algorithm: ChecksumAlgorithm) -> &str {
        match algorithm {
            ChecksumAlgorithm::Md5 => &self.md5,
            ChecksumAlgorithm::Sha1 => &self.sha1,
            ChecksumAlgorithm::Sha256 => &self.sha256,
        }
    }
}

/// One checksummed file: relative path, byte size, digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumEntry {
    /// Path relative to the distribution directory.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Digests of the file contents.
    pub sums: FileChecksums,
}

/// Computes all three digests plus the byte count in one pass.
pub struct MultiHasher {
    md5: md5::Context,
    sha1: sha1::Sha1,
    sha256: sha2::Sha256,
    size: u64,
}

impl MultiHasher {
    /// Create a fresh hasher.
    pub fn new() -> Self {
        Self {
            md5: md5::Context::new(),
            sha1: sha1::Sha1::new(),
            sha256: sha2::Sha256::new(),
            size: 0,
        }
    }

    /// Feed data into all digests.
    pub fn update(&mut self, data: &[u8]) {
        self.size += data.len() as u64;
        self.md5.consume(data);
        self.sha1.update(data);
        self.sha256.update(data);
    }

    /// Finish and return the byte count and hex digests.
    pub fn finalize(self) -> (u64, FileChecksums) {
        let sums = FileChecksums {
            md5: format!("{:x}", self.md5.compute()),
            sha1: format!("{:x}", self.sha1.finalize()),
            sha256: format!("{:x}", self.sha256.finalize()),
        };
        (self.size, sums)
    }
}

impl Default for MultiHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MultiHasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Checksum everything a reader yields.
pub fn checksum_reader<R: Read>(mut reader: R) -> std::io::Result<(u64, FileChecksums)> {
    let mut hasher = MultiHasher::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize())
}

/// Checksum an in-memory buffer.
pub fn checksum_data(data: &[u8]) -> (u64, FileChecksums) {
    let mut hasher = MultiHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Checksum a file on disk, naming the path on failure.
pub fn checksum_file(path: &Path) -> Result<(u64, FileChecksums)> {
    let file = File::open(path).map_err(|e| Error::path(path, e))?;
    checksum_reader(file).map_err(|e| Error::path(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_str() {
        assert_eq!(ChecksumAlgorithm::Md5.as_str(), "MD5Sum");
        assert_eq!(ChecksumAlgorithm::Sha1.as_str(), "SHA1");
        assert_eq!(ChecksumAlgorithm::Sha256.as_str(), "SHA256");
    }

    #[test]
    fn test_known_digests() {
        let (size, sums) = checksum_data(b"hello world");

        assert_eq!(size, 11);
        assert_eq!(sums.md5, "5eb63bbbe01eeed093cb22bb8f5acdc3");
        assert_eq!(sums.sha1, "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
        assert_eq!(
            sums.sha256,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        let mut hasher = MultiHasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        let incremental = hasher.finalize();

        assert_eq!(incremental, checksum_data(b"hello world"));
    }

    #[test]
    fn test_one_byte_difference() {
        let (_, a) = checksum_data(b"release 1.0");
        let (_, b) = checksum_data(b"release 1.1");

        assert_ne!(a.md5, b.md5);
        assert_ne!(a.sha1, b.sha1);
        assert_ne!(a.sha256, b.sha256);
    }

    #[test]
    fn test_checksum_reader() {
        let data: &[u8] = b"some index data";
        let (size, sums) = checksum_reader(data).unwrap();

        assert_eq!(size, data.len() as u64);
        assert_eq!(sums, checksum_data(data).1);
    }

    #[test]
    fn test_get_by_algorithm() {
        let (_, sums) = checksum_data(b"x");
        assert_eq!(sums.get(ChecksumAlgorithm::Md5), sums.md5);
        assert_eq!(sums.get(ChecksumAlgorithm::Sha1), sums.sha1);
        assert_eq!(sums.get(ChecksumAlgorithm::Sha256), sums.sha256);
    }

    #[test]
    fn test_checksum_missing_file() {
        let err = checksum_file(Path::new("/nonexistent/file")).unwrap_err();
        assert!(matches!(err, Error::Path { .. }));
        assert!(err.to_string().contains("/nonexistent/file"));
    }
}
