//! Repository configuration.
//!
//! Everything that was once hardwired into the build scripts is injectable
//! here: repository identity, the codename-to-version map, architecture
//! naming, and the scan-failure policy. A configuration can be loaded from
//! a TOML file or taken from `Default`, which carries the shipped release
//! mapping.

use crate::error::Error;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Configuration for a repository build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// `Origin:` value stamped into every manifest.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// `Label:` value stamped into every manifest.
    #[serde(default = "default_origin")]
    pub label: String,

    /// Component directory name under each distribution.
    #[serde(default = "default_component")]
    pub component: String,

    /// Codename to version-string map. A codename missing from this map is
    /// a configuration error, never a silent default.
    #[serde(default = "default_versions")]
    pub versions: HashMap<String, String>,

    /// Explicit architecture names keyed by architecture directory name.
    /// Directories not listed here fall back to the naming convention: the
    /// second dash-separated token of the directory name.
    #[serde(default)]
    pub architectures: HashMap<String, String>,

    /// Abort the whole build when the package scanner fails. When false the
    /// failing architecture is logged and skipped instead.
    #[serde(default = "default_true")]
    pub halt_on_scan_error: bool,
}

fn default_origin() -> String {
    "DwarfTherapist".to_string()
}

fn default_component() -> String {
    "universe".to_string()
}

fn default_versions() -> HashMap<String, String> {
    HashMap::from([
        ("oneiric".to_string(), "11.10".to_string()),
        ("lucid".to_string(), "10.04".to_string()),
    ])
}

fn default_true() -> bool {
    true
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            label: default_origin(),
            component: default_component(),
            versions: default_versions(),
            architectures: HashMap::new(),
            halt_on_scan_error: true,
        }
    }
}

impl RepoConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::path(path, e))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| Error::invalid_config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.origin.is_empty() {
            return Err(Error::invalid_config("origin cannot be empty"));
        }
        if self.component.is_empty() {
            return Err(Error::invalid_config("component cannot be empty"));
        }
        Ok(())
    }

    /// Resolve the version string for a codename.
    pub fn version_of(&self, codename: &str) -> Result<&str> {
        self.versions
            .get(codename)
            .map(|v| v.as_str())
            .ok_or_else(|| Error::UnknownDistribution(codename.to_string()))
    }

    /// Resolve the architecture name for an architecture directory.
    ///
    /// An explicit entry in `architectures` wins; otherwise the directory
    /// name's second dash-separated token is used (`dists-amd64` names
    /// `amd64`).
    pub fn architecture_name(&self, dir_name: &str) -> Result<String> {
        if let Some(name) = self.architectures.get(dir_name) {
            return Ok(name.clone());
        }
        match dir_name.split('-').nth(1) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(Error::ArchitectureName(dir_name.to_string())),
        }
    }
}
