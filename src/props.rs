//! Credentials/properties file for the upload tools.
//!
//! A flat `key = value` text file kept outside the repository, typically in
//! the releaser's home directory:
//!
//! ```text
//! server = ftp.example.org
//! user = releases
//! password = hunter2
//! remoteDir = htdocs
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Connection settings for a remote upload target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Props {
    /// FTP server host name.
    pub server: String,
    /// Login user.
    pub user: String,
    /// Login password.
    pub password: String,
    /// Directory to change into after login.
    pub remote_dir: String,
}

impl Props {
    /// Load properties from a file, expanding a leading `~/`.
    pub fn load(path: &Path) -> Result<Self> {
        let path = expand_home(path);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read credentials file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse credentials file: {}", path.display()))
    }

    /// Parse the `key = value` format.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut server = None;
        let mut user = None;
        let mut password = None;
        let mut remote_dir = None;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                match key {
                    "server" => server = Some(value.to_string()),
                    "user" => user = Some(value.to_string()),
                    "password" => password = Some(value.to_string()),
                    "remoteDir" => remote_dir = Some(value.to_string()),
                    _ => {} // Ignore unknown keys
                }
            }
        }

        Ok(Props {
            server: server.context("Missing server in credentials file")?,
            user: user.context("Missing user in credentials file")?,
            password: password.context("Missing password in credentials file")?,
            remote_dir: remote_dir.context("Missing remoteDir in credentials file")?,
        })
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(dirs) = directories_next::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    path.to_path_buf()
}
