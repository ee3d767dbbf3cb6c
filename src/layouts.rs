//! Memory-layout data files.
//!
//! Layout files live in `<layouts-dir>/<platform>/<file>` and carry a
//! `checksum = <value>` line identifying the application binary they
//! describe. Each file is uploaded twice: under its platform directory for
//! browsing, and under `checksum/<value>` so the application can fetch the
//! layout matching the binary it is attached to.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::remote::RemoteStore;

/// One layout file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Full path of the file.
    pub path: PathBuf,
    /// Platform directory it came from (`linux`, `windows`, `osx`, ...).
    pub platform: String,
    /// File name.
    pub name: String,
}

/// Extract the checksum value from a layout file.
///
/// The first line of the form `checksum = <value>` wins; a file without
/// one is an error.
pub fn layout_checksum(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file: {}", path.display()))?;

    for line in contents.lines() {
        if let Some((_, checksum)) = lazy_regex::regex_captures!(r"^checksum\s*=\s*(\w+)", line) {
            return Ok(checksum.to_string());
        }
    }
    bail!("No checksum line in layout file: {}", path.display());
}

/// List every layout file under `<layouts_dir>/<platform>/`.
pub fn find_layouts(layouts_dir: &Path) -> Result<Vec<Layout>> {
    let mut layouts = Vec::new();
    let platforms = sorted_entries(layouts_dir)?;
    for platform_dir in platforms {
        if !platform_dir.is_dir() {
            continue;
        }
        let platform = file_name(&platform_dir);
        for path in sorted_entries(&platform_dir)? {
            if !path.is_file() {
                continue;
            }
            layouts.push(Layout {
                name: file_name(&path),
                platform: platform.clone(),
                path,
            });
        }
    }
    Ok(layouts)
}

/// Upload every layout under `base`, keyed by platform/name and by
/// checksum.
pub fn upload_layouts(
    store: &mut dyn RemoteStore,
    base: &str,
    layouts_dir: &Path,
) -> Result<usize> {
    let layouts = find_layouts(layouts_dir)?;

    store.ensure_dir(base)?;
    let platforms: BTreeSet<&str> = layouts.iter().map(|l| l.platform.as_str()).collect();
    for platform in platforms {
        store.ensure_dir(&format!("{base}/{platform}"))?;
    }
    store.ensure_dir(&format!("{base}/checksum"))?;

    for layout in &layouts {
        let checksum = layout_checksum(&layout.path)?;
        let named = format!("{}/{}/{}", base, layout.platform, layout.name);
        log::info!("STOR {} -> {}", layout.path.display(), named);
        store.store(&named, &mut open(&layout.path)?)?;

        let keyed = format!("{base}/checksum/{checksum}");
        log::info!("STOR {} -> {}", layout.path.display(), keyed);
        store.store(&keyed, &mut open(&layout.path)?)?;
    }
    Ok(layouts.len())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?
    {
        entries.push(entry?.path());
    }
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap_or_default().to_string_lossy().to_string()
}
