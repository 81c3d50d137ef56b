//! Cache entry naming and inspection
//!
//! A cache entry is a directory under the cache root named after the
//! archive it was extracted from. Its presence is the only record kept.

use crate::error::{RtfetchError, RtfetchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Archive suffixes removed when naming a cache directory
const ARCHIVE_SUFFIXES: &[&str] = &[".zip", ".tar.gz"];

/// Cache directory name for an archive file name.
///
/// `jdk-11.0.2_linux-x64.tar.gz` -> `jdk-11.0.2_linux-x64`
///
/// Only the last path component is used, so the entry always lands
/// directly under the cache root. Empty and dot-prefixed results are
/// rejected: they would alias the root or an in-flight staging directory.
pub fn cache_dir_name(file_name: &str) -> RtfetchResult<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let name = ARCHIVE_SUFFIXES
        .iter()
        .fold(base, |name, suffix| name.strip_suffix(suffix).unwrap_or(name));

    if name.is_empty() || name.starts_with('.') {
        return Err(RtfetchError::InvalidArchiveName(file_name.to_string()));
    }
    Ok(name)
}

/// Runtime root inside a cache entry: `<entry>/jdk-<version>`
pub fn runtime_path(entry_dir: &Path, version: &str) -> PathBuf {
    entry_dir.join(format!("jdk-{}", version))
}

/// Format bytes as human-readable size (e.g., "1.5 GB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// An extracted runtime found in the cache root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRuntime {
    /// Directory name (the archive name without its suffix)
    pub name: String,
    /// Absolute path of the entry directory
    pub path: PathBuf,
    /// Total size of all files below the entry
    pub size_bytes: u64,
}

/// List cache entries, sorted by name.
///
/// Dot-prefixed directories are in-flight extractions and are skipped.
pub fn list_entries(root: &Path) -> RtfetchResult<Vec<CachedRuntime>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let read = fs::read_dir(root)
        .map_err(|e| RtfetchError::io(format!("reading cache root {}", root.display()), e))?;

    let mut entries = Vec::new();
    for entry in read.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !path.is_dir() {
            continue;
        }
        entries.push(CachedRuntime {
            size_bytes: dir_size(&path),
            name,
            path,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn dir_size(path: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(path) else {
        return 0;
    };

    entries
        .flatten()
        .map(|entry| match entry.file_type() {
            Ok(ft) if ft.is_dir() => dir_size(&entry.path()),
            Ok(ft) if ft.is_file() => entry.metadata().map(|m| m.len()).unwrap_or(0),
            _ => 0,
        })
        .sum()
}
