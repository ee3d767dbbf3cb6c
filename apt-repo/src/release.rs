//! Release file rendering.
//!
//! Two flavors exist: the small per-architecture manifest and the
//! distribution-level manifest with checksum blocks. Both render through
//! `Display` and are written bit-for-bit in the layout APT-compatible
//! package managers expect.

use crate::hash::{ChecksumAlgorithm, ChecksumEntry};
use chrono::{DateTime, Utc};
use std::fmt;

/// Date layout of the `Date:` field.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// The manifest written next to one architecture's package index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchRelease {
    /// Distribution codename this architecture belongs to.
    pub archive: String,
    /// Distribution version string.
    pub version: String,
    /// Component name.
    pub component: String,
    /// Repository origin.
    pub origin: String,
    /// Repository label.
    pub label: String,
    /// Architecture name.
    pub architecture: String,
}

impl fmt::Display for ArchRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Archive: {}", self.archive)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Component: {}", self.component)?;
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Architecture: {}", self.architecture)
    }
}

/// The distribution-level manifest: header fields plus one checksum block
/// per digest algorithm, blocks separated by a blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistRelease {
    /// Repository origin.
    pub origin: String,
    /// Repository label.
    pub label: String,
    /// Suite name.
    pub suite: String,
    /// Distribution version string.
    pub version: String,
    /// Distribution codename.
    pub codename: String,
    /// Build timestamp; injected by the caller so runs can be pinned.
    pub date: DateTime<Utc>,
    /// Architectures present in this distribution.
    pub architectures: Vec<String>,
    /// Components present in this distribution.
    pub components: Vec<String>,
    /// Checksummed files, one entry per file in the distribution tree.
    pub entries: Vec<ChecksumEntry>,
}

impl DistRelease {
    fn write_block(&self, f: &mut fmt::Formatter<'_>, algorithm: ChecksumAlgorithm) -> fmt::Result {
        writeln!(f, "{}:", algorithm.as_str())?;
        for entry in &self.entries {
            // One leading space, digest, tab, size right-justified to 15
            // columns, single space, relative path.
            writeln!(
                f,
                " {}\t{:>15} {}",
                entry.sums.get(algorithm),
                entry.size,
                entry.path
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for DistRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Suite: {}", self.suite)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Codename: {}", self.codename)?;
        writeln!(f, "Date: {}", self.date.format(DATE_FORMAT))?;
        writeln!(f, "Architectures: {}", self.architectures.join(" "))?;
        writeln!(f, "Components: {}", self.components.join(" "))?;

        let mut first = true;
        for &algorithm in ChecksumAlgorithm::all() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            self.write_block(f, algorithm)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::checksum_data;
    use chrono::TimeZone;

    fn entry(path: &str, data: &[u8]) -> ChecksumEntry {
        let (size, sums) = checksum_data(data);
        ChecksumEntry {
            path: path.to_string(),
            size,
            sums,
        }
    }

    fn sample_release() -> DistRelease {
        DistRelease {
            origin: "DwarfTherapist".to_string(),
            label: "DwarfTherapist".to_string(),
            suite: "lucid".to_string(),
            version: "10.04".to_string(),
            codename: "lucid".to_string(),
            date: Utc.with_ymd_and_hms(2011, 10, 13, 14, 30, 0).unwrap(),
            architectures: vec!["amd64".to_string(), "i386".to_string()],
            components: vec!["universe".to_string()],
            entries: vec![entry("universe/dists-amd64/Release", b"hello world")],
        }
    }

    #[test]
    fn test_arch_release_layout() {
        let release = ArchRelease {
            archive: "lucid".to_string(),
            version: "10.04".to_string(),
            component: "universe".to_string(),
            origin: "DwarfTherapist".to_string(),
            label: "DwarfTherapist".to_string(),
            architecture: "amd64".to_string(),
        };

        assert_eq!(
            release.to_string(),
            "Archive: lucid\n\
             Version: 10.04\n\
             Component: universe\n\
             Origin: DwarfTherapist\n\
             Label: DwarfTherapist\n\
             Architecture: amd64\n"
        );
    }

    #[test]
    fn test_dist_release_header() {
        let text = sample_release().to_string();

        assert!(text.starts_with(
            "Origin: DwarfTherapist\n\
             Label: DwarfTherapist\n\
             Suite: lucid\n\
             Version: 10.04\n\
             Codename: lucid\n\
             Date: Thu, 13 Oct 2011 14:30:00 UTC\n\
             Architectures: amd64 i386\n\
             Components: universe\n"
        ));
    }

    #[test]
    fn test_checksum_entry_layout() {
        let text = sample_release().to_string();

        // 11 bytes right-justified to 15 columns after a tab.
        assert!(text.contains(
            " 5eb63bbbe01eeed093cb22bb8f5acdc3\t             11 universe/dists-amd64/Release\n"
        ));
        assert!(text.contains(
            " 2aae6c35c94fcfb415dbe95f408b9ce91ee846ed\t             11 universe/dists-amd64/Release\n"
        ));
    }

    #[test]
    fn test_block_order_and_separators() {
        let text = sample_release().to_string();

        let md5 = text.find("MD5Sum:\n").unwrap();
        let sha1 = text.find("SHA1:\n").unwrap();
        let sha256 = text.find("SHA256:\n").unwrap();
        assert!(md5 < sha1 && sha1 < sha256);

        // Exactly one blank line between consecutive blocks, none trailing.
        assert!(text.contains("Release\n\nSHA1:\n"));
        assert!(text.contains("Release\n\nSHA256:\n"));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn test_blocks_share_paths_and_counts() {
        let mut release = sample_release();
        release.entries.push(entry("universe/dists-amd64/app.deb", b"deb"));
        let text = release.to_string();

        for path in ["universe/dists-amd64/Release", "universe/dists-amd64/app.deb"] {
            let count = text.matches(path).count();
            assert_eq!(count, 3, "{path} should appear once per block");
        }
    }
}
