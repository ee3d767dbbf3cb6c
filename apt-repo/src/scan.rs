//! Package index generation via an external scanning tool.

use crate::error::Error;
use crate::Result;
use std::path::Path;
use std::process::{Command, Stdio};

/// Produces the uncompressed package index for one architecture directory.
///
/// The production implementation shells out to `dpkg-scanpackages`; tests
/// and other tooling can substitute their own.
pub trait PackageScanner {
    /// Scan `arch_dir` (relative to `component_dir`) and return the package
    /// index text. `prefix` is prepended to the `Filename:` entries the
    /// scanner emits, so packages resolve relative to the repository root.
    fn scan(&self, component_dir: &Path, arch_dir: &str, prefix: &str) -> Result<Vec<u8>>;
}

/// Runs `dpkg-scanpackages <arch-dir> /dev/null <prefix>` from the
/// component directory with captured output.
#[derive(Debug, Clone)]
pub struct DpkgScanPackages {
    /// Command to invoke.
    pub command: String,
}

impl Default for DpkgScanPackages {
    fn default() -> Self {
        Self {
            command: "dpkg-scanpackages".to_string(),
        }
    }
}

impl PackageScanner for DpkgScanPackages {
    fn scan(&self, component_dir: &Path, arch_dir: &str, prefix: &str) -> Result<Vec<u8>> {
        log::debug!(
            "Running {} {} /dev/null {} in {}",
            self.command,
            arch_dir,
            prefix,
            component_dir.display()
        );

        let output = Command::new(&self.command)
            .current_dir(component_dir)
            .arg(arch_dir)
            .arg("/dev/null")
            .arg(prefix)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::ScannerNotFound {
                        command: self.command.clone(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(Error::ScannerFailed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
