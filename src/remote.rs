//! Remote storage for release artifacts.
//!
//! Uploads go through the [`RemoteStore`] trait so the same mirroring and
//! layout-upload logic runs against a real FTP server or a local directory
//! (tests, dry runs).

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use suppaftp::{FtpError, FtpStream, Status};
use walkdir::WalkDir;

use crate::props::Props;

/// A place files can be uploaded to.
pub trait RemoteStore {
    /// Create a directory if it does not exist yet. Succeeds when the
    /// directory is already present.
    fn ensure_dir(&mut self, path: &str) -> Result<()>;

    /// Store a stream under `path`. Parent directories must exist.
    fn store(&mut self, path: &str, reader: &mut dyn Read) -> Result<()>;

    /// Flush and close the connection, where there is one.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Open the store the command line asked for: a local directory when
/// `local` is given, otherwise FTP using the credentials file.
pub fn open_store(credentials: Option<&Path>, local: Option<&Path>) -> Result<Box<dyn RemoteStore>> {
    match (local, credentials) {
        (Some(dir), _) => Ok(Box::new(LocalStore::new(dir)?)),
        (None, Some(path)) => {
            let props = Props::load(path)?;
            Ok(Box::new(FtpStore::connect(&props)?))
        }
        (None, None) => anyhow::bail!("Either a credentials file or --local is required"),
    }
}

/// FTP-backed store.
pub struct FtpStore {
    stream: FtpStream,
}

impl FtpStore {
    /// Connect, log in and change into the configured remote directory.
    pub fn connect(props: &Props) -> Result<Self> {
        let addr = format!("{}:21", props.server);
        let mut stream = FtpStream::connect(&addr)
            .with_context(|| format!("Failed to connect to {}", addr))?;
        stream
            .login(&props.user, &props.password)
            .with_context(|| format!("Login failed for {} on {}", props.user, props.server))?;
        stream
            .cwd(&props.remote_dir)
            .with_context(|| format!("Cannot change to remote directory {}", props.remote_dir))?;
        Ok(Self { stream })
    }
}

impl RemoteStore for FtpStore {
    fn ensure_dir(&mut self, path: &str) -> Result<()> {
        match self.stream.mkdir(path) {
            Ok(()) => Ok(()),
            // 550 is the reply for a directory that already exists.
            Err(FtpError::UnexpectedResponse(ref response))
                if response.status == Status::FileUnavailable =>
            {
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to create remote directory {path}")),
        }
    }

    fn store(&mut self, path: &str, mut reader: &mut dyn Read) -> Result<()> {
        self.stream
            .put_file(path, &mut reader)
            .with_context(|| format!("Failed to store {path}"))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.stream.quit().context("Failed to close FTP connection")?;
        Ok(())
    }
}

/// Store rooted in a local directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store under `root`, creating the directory if needed.
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            std::fs::create_dir_all(root)
                .with_context(|| format!("Failed to create {}", root.display()))?;
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }
}

impl RemoteStore for LocalStore {
    fn ensure_dir(&mut self, path: &str) -> Result<()> {
        let dir = self.root.join(path);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(())
    }

    fn store(&mut self, path: &str, reader: &mut dyn Read) -> Result<()> {
        let target = self.root.join(path);
        let mut file = File::create(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        std::io::copy(reader, &mut file)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        Ok(())
    }
}

/// Mirror a local tree into the store under `base`, directories first.
pub fn mirror_tree(store: &mut dyn RemoteStore, base: &str, local: &Path) -> Result<()> {
    store.ensure_dir(base)?;

    for entry in WalkDir::new(local) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(local).unwrap();
        if relative.as_os_str().is_empty() {
            continue;
        }
        let remote = format!("{}/{}", base, relative.to_string_lossy());

        if entry.file_type().is_dir() {
            log::info!("MKDIR {remote}");
            store.ensure_dir(&remote)?;
        } else if entry.file_type().is_file() {
            log::info!("STOR {} -> {}", entry.path().display(), remote);
            let mut file = File::open(entry.path())
                .with_context(|| format!("Failed to open {}", entry.path().display()))?;
            store.store(&remote, &mut file)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_local_store_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut store = LocalStore::new(&tmp.path().join("remote")).unwrap();

        store.ensure_dir("apt").unwrap();
        store.ensure_dir("apt").unwrap(); // idempotent
        store
            .store("apt/Release", &mut "Origin: X\n".as_bytes())
            .unwrap();

        let written = fs::read_to_string(tmp.path().join("remote/apt/Release")).unwrap();
        assert_eq!(written, "Origin: X\n");
    }

    #[test]
    fn test_mirror_tree() {
        let tmp = TempDir::new().unwrap();
        let local = tmp.path().join("local");
        fs::create_dir_all(local.join("dists/lucid/universe")).unwrap();
        fs::write(local.join("dists/lucid/Release"), b"release").unwrap();
        fs::write(local.join("dists/lucid/universe/Packages.gz"), b"gz").unwrap();

        let remote_root = tmp.path().join("remote");
        let mut store = LocalStore::new(&remote_root).unwrap();
        mirror_tree(&mut store, "apt", &local).unwrap();

        assert_eq!(
            fs::read(remote_root.join("apt/dists/lucid/Release")).unwrap(),
            b"release"
        );
        assert_eq!(
            fs::read(remote_root.join("apt/dists/lucid/universe/Packages.gz")).unwrap(),
            b"gz"
        );
    }

    #[test]
    fn test_mirror_missing_tree_fails() {
        let tmp = TempDir::new().unwrap();
        let mut store = LocalStore::new(&tmp.path().join("remote")).unwrap();
        assert!(mirror_tree(&mut store, "apt", &tmp.path().join("gone")).is_err());
    }
}
