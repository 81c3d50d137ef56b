//! Runtime cache store
//!
//! Maps descriptors to directories under the cache root and fetches them on
//! a miss. Only one fetch runs at a time in the whole process.

use super::entry::{cache_dir_name, list_entries, runtime_path, CachedRuntime};
use crate::catalog::BinaryDescriptor;
use crate::error::{RtfetchError, RtfetchResult};
use crate::fetch::ArchiveFetcher;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

/// Serializes every download-and-extract in the process, across all
/// descriptors and all `CacheStore` instances.
static FETCH_LOCK: Mutex<()> = Mutex::new(());

/// Local cache of extracted runtimes
#[derive(Clone)]
pub struct CacheStore {
    root: PathBuf,
    fetcher: ArchiveFetcher,
}

impl CacheStore {
    /// Create a store rooted at `root`. Relative roots are made absolute
    /// against the current directory; nothing is created on disk yet.
    pub fn new(root: impl AsRef<Path>, fetcher: ArchiveFetcher) -> RtfetchResult<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root)
            .map_err(|e| RtfetchError::io(format!("resolving cache root {}", root.display()), e))?;

        Ok(Self { root, fetcher })
    }

    /// The cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a descriptor is extracted into, always a direct child of the root
    pub fn entry_dir(&self, descriptor: &BinaryDescriptor) -> RtfetchResult<PathBuf> {
        Ok(self.root.join(cache_dir_name(&descriptor.file_name)?))
    }

    /// Whether the descriptor is already extracted
    pub fn is_cached(&self, descriptor: &BinaryDescriptor) -> bool {
        self.entry_dir(descriptor).is_ok_and(|entry| entry.exists())
    }

    /// Return the runtime path for `descriptor`, downloading it first if needed.
    ///
    /// The result is always `<entry>/jdk-<version>`. An existing entry
    /// directory is trusted as-is.
    pub fn materialize(&self, descriptor: &BinaryDescriptor) -> RtfetchResult<PathBuf> {
        let entry = self.entry_dir(descriptor)?;
        let runtime = runtime_path(&entry, descriptor.version());

        if entry.exists() {
            debug!("Cache hit: {}", entry.display());
            return Ok(runtime);
        }

        debug!("Cache miss: {}, waiting for fetch lock", entry.display());
        // A panic in another fetch leaves nothing behind worth guarding
        let _guard = FETCH_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Another caller may have fetched the same entry while we waited
        if entry.exists() {
            debug!("Fetched concurrently: {}", entry.display());
            return Ok(runtime);
        }

        info!("Fetching {} into {}", descriptor.file_name, self.root.display());
        self.fetcher.fetch_and_extract(descriptor, &entry)?;

        Ok(runtime)
    }

    /// Extracted runtimes currently in the cache
    pub fn list(&self) -> RtfetchResult<Vec<CachedRuntime>> {
        list_entries(&self.root)
    }
}
