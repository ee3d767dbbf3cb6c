//! # APT Repository Index Builder
//!
//! A Rust library for building the metadata of a Debian-style APT
//! repository: per-architecture package indexes (`Packages.gz`) and Release
//! files with checksum blocks over the distribution tree.
//!
//! The repository layout consumed is
//! `<base>/dists/<codename>/<component>/<arch-dir>/`, where each
//! architecture directory holds the package files for one target platform.
//! Package scanning is delegated to an external tool behind the
//! [`PackageScanner`] trait so it can be swapped or mocked.
//!
//! ## Example
//!
//! ```no_run
//! use apt_repo::{DpkgScanPackages, RepoConfig, Repository};
//! use chrono::Utc;
//!
//! # fn main() -> apt_repo::Result<()> {
//! let config = RepoConfig::default();
//! let scanner = DpkgScanPackages::default();
//! let repo = Repository::new(&config, &scanner);
//!
//! for dist in repo.build("/srv/repo".as_ref(), Utc::now())? {
//!     println!("{}: {} files indexed", dist.codename, dist.indexed_files);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod release;
pub mod repository;
pub mod scan;
pub mod walk;

pub use config::RepoConfig;
pub use error::{Error, Result};
pub use hash::{ChecksumAlgorithm, ChecksumEntry, FileChecksums};
pub use release::{ArchRelease, DistRelease, DATE_FORMAT};
pub use repository::{DistSummary, Repository};
pub use scan::{DpkgScanPackages, PackageScanner};

/// Directory under `dists/` that is reserved as a template and never built.
pub const TEMPLATE_DIR: &str = "template";
