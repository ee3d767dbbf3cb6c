//! Repository build orchestration.
//!
//! A build is one linear pass per distribution: index every architecture
//! directory, then checksum the distribution tree and write the
//! distribution Release file. Generated files are written to a temporary
//! file in their destination directory and renamed into place, so a crash
//! never leaves a half-written manifest behind.

use crate::config::RepoConfig;
use crate::error::Error;
use crate::hash::checksum_file;
use crate::release::{ArchRelease, DistRelease};
use crate::scan::PackageScanner;
use crate::{walk, ChecksumEntry, Result, TEMPLATE_DIR};
use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Name of both manifest files.
const RELEASE_FILE: &str = "Release";

/// Name of the compressed package index.
const PACKAGES_FILE: &str = "Packages.gz";

/// What one distribution build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistSummary {
    /// Distribution codename.
    pub codename: String,
    /// Architectures that were indexed.
    pub architectures: Vec<String>,
    /// Number of files covered by the checksum blocks.
    pub indexed_files: usize,
}

/// A repository build over a configured scanner.
pub struct Repository<'a> {
    config: &'a RepoConfig,
    scanner: &'a dyn PackageScanner,
}

impl<'a> Repository<'a> {
    /// Create a repository build from configuration and a scanner.
    pub fn new(config: &'a RepoConfig, scanner: &'a dyn PackageScanner) -> Self {
        Self { config, scanner }
    }

    /// Build every distribution under `<base>/dists/`, skipping the
    /// reserved template directory.
    pub fn build(&self, base: &Path, now: DateTime<Utc>) -> Result<Vec<DistSummary>> {
        let dists_dir = base.join("dists");
        let mut codenames = Vec::new();
        for entry in fs::read_dir(&dists_dir).map_err(|e| Error::path(&dists_dir, e))? {
            let entry = entry.map_err(|e| Error::path(&dists_dir, e))?;
            if !entry.file_type().map_err(|e| Error::path(entry.path(), e))?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name != TEMPLATE_DIR {
                codenames.push(name);
            }
        }
        codenames.sort();

        let mut summaries = Vec::new();
        for codename in &codenames {
            summaries.push(self.build_dist(base, codename, now)?);
        }
        Ok(summaries)
    }

    /// Build one distribution: every architecture index, then the
    /// distribution Release file.
    pub fn build_dist(
        &self,
        base: &Path,
        codename: &str,
        now: DateTime<Utc>,
    ) -> Result<DistSummary> {
        let version = self.config.version_of(codename)?.to_string();
        let dist_dir = base.join("dists").join(codename);
        let component_dir = dist_dir.join(&self.config.component);
        let prefix = format!("dists/{}/{}/", codename, self.config.component);

        let mut arch_dirs = Vec::new();
        for entry in fs::read_dir(&component_dir).map_err(|e| Error::path(&component_dir, e))? {
            let entry = entry.map_err(|e| Error::path(&component_dir, e))?;
            if entry.file_type().map_err(|e| Error::path(entry.path(), e))?.is_dir() {
                arch_dirs.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        arch_dirs.sort();

        let mut architectures = Vec::new();
        for arch_dir in &arch_dirs {
            let arch = self.config.architecture_name(arch_dir)?;
            match self.build_arch(&component_dir, arch_dir, &arch, codename, &version, &prefix) {
                Ok(()) => architectures.push(arch),
                Err(e @ (Error::ScannerNotFound { .. } | Error::ScannerFailed { .. }))
                    if !self.config.halt_on_scan_error =>
                {
                    log::error!("Skipping {codename}/{arch_dir}: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        let files = walk::collect_files(&dist_dir)?;
        let mut entries = Vec::new();
        for path in &files {
            // The distribution manifest never lists itself.
            if path == RELEASE_FILE {
                continue;
            }
            let (size, sums) = checksum_file(&dist_dir.join(path))?;
            entries.push(ChecksumEntry {
                path: path.clone(),
                size,
                sums,
            });
        }

        let release = DistRelease {
            origin: self.config.origin.clone(),
            label: self.config.label.clone(),
            suite: codename.to_string(),
            version,
            codename: codename.to_string(),
            date: now,
            architectures: architectures.clone(),
            components: vec![self.config.component.clone()],
            entries,
        };
        let indexed_files = release.entries.len();
        write_atomic(&dist_dir.join(RELEASE_FILE), release.to_string().as_bytes())?;

        log::info!(
            "Built {}: {} architectures, {} files indexed",
            codename,
            architectures.len(),
            indexed_files
        );

        Ok(DistSummary {
            codename: codename.to_string(),
            architectures,
            indexed_files,
        })
    }

    fn build_arch(
        &self,
        component_dir: &Path,
        arch_dir: &str,
        arch: &str,
        codename: &str,
        version: &str,
        prefix: &str,
    ) -> Result<()> {
        log::info!("Scanning packages in {}", component_dir.join(arch_dir).display());

        let index = self.scanner.scan(component_dir, arch_dir, prefix)?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&index)?;
        let compressed = encoder.finish()?;

        let arch_path = component_dir.join(arch_dir);
        write_atomic(&arch_path.join(PACKAGES_FILE), &compressed)?;

        let release = ArchRelease {
            archive: codename.to_string(),
            version: version.to_string(),
            component: self.config.component.clone(),
            origin: self.config.origin.clone(),
            label: self.config.label.clone(),
            architecture: arch.to_string(),
        };
        write_atomic(&arch_path.join(RELEASE_FILE), release.to_string().as_bytes())?;
        Ok(())
    }
}

/// Write `contents` to `path` through a temporary file in the same
/// directory, renamed into place once fully written.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().ok_or_else(|| {
        Error::path(path, std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent directory"))
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::path(dir, e))?;
    tmp.write_all(contents).map_err(|e| Error::path(path, e))?;
    tmp.persist(path).map_err(|e| Error::path(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct StubScanner;

    impl PackageScanner for StubScanner {
        fn scan(&self, _component_dir: &Path, arch_dir: &str, prefix: &str) -> Result<Vec<u8>> {
            Ok(format!("Package: demo\nFilename: {prefix}{arch_dir}/demo.deb\n").into_bytes())
        }
    }

    fn pinned_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2011, 10, 13, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_write_atomic_overwrites() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(RELEASE_FILE);

        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        // Only the target remains; no temp litter.
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unknown_codename_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let dist_dir = tmp.path().join("dists/quantal/universe/dists-amd64");
        fs::create_dir_all(&dist_dir).unwrap();

        let config = RepoConfig::default();
        let repo = Repository::new(&config, &StubScanner);
        let err = repo.build_dist(tmp.path(), "quantal", pinned_now()).unwrap_err();

        assert!(matches!(err, Error::UnknownDistribution(_)));
        assert!(!tmp.path().join("dists/quantal/Release").exists());
        assert!(!dist_dir.join(PACKAGES_FILE).exists());
    }

    #[test]
    fn test_missing_component_dir_names_path() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("dists/lucid")).unwrap();

        let config = RepoConfig::default();
        let repo = Repository::new(&config, &StubScanner);
        let err = repo.build_dist(tmp.path(), "lucid", pinned_now()).unwrap_err();

        assert!(err.to_string().contains("universe"));
    }
}
