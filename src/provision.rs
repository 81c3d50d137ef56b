//! End-to-end runtime provisioning
//!
//! Ties the resolver and the cache store together:
//! request -> catalog lookup -> descriptor -> cached or freshly fetched path.

use crate::archive::{Extractor, Unarchiver};
use crate::cache::CacheStore;
use crate::catalog::{BinaryDescriptor, CatalogClient};
use crate::config::Config;
use crate::error::RtfetchResult;
use crate::fetch::ArchiveFetcher;
use crate::platform::Platform;
use crate::resolve::Resolver;
use crate::transport::{Transport, UreqTransport};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Which release of a runtime to provision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// An exact version as it appears in release names, e.g. `11.0.2`
    Exact(String),
    /// The newest release of a major version
    Latest(u32),
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(version) => write!(f, "{}", version),
            Self::Latest(major) => write!(f, "latest {}", major),
        }
    }
}

/// A fully specified runtime request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeRequest {
    pub version: VersionSpec,
    pub platform: Platform,
    pub implementation: String,
}

/// Resolves and caches runtimes
#[derive(Clone)]
pub struct Provisioner {
    resolver: Resolver,
    store: CacheStore,
}

impl Provisioner {
    pub fn new(resolver: Resolver, store: CacheStore) -> Self {
        Self { resolver, store }
    }

    /// Build a provisioner from configuration with the default ureq transports
    pub fn from_config(config: &Config, cache_root: &Path) -> RtfetchResult<Self> {
        let catalog_transport: Arc<dyn Transport> = Arc::new(UreqTransport::catalog(&config.http)?);
        let download_transport: Arc<dyn Transport> =
            Arc::new(UreqTransport::download(&config.http)?);

        Self::with_transports(config, cache_root, catalog_transport, download_transport)
    }

    /// Build a provisioner with caller-supplied transports
    pub fn with_transports(
        config: &Config,
        cache_root: &Path,
        catalog_transport: Arc<dyn Transport>,
        download_transport: Arc<dyn Transport>,
    ) -> RtfetchResult<Self> {
        let unarchiver: Arc<dyn Unarchiver> = Arc::new(Extractor);
        let catalog = CatalogClient::new(config.catalog.url.clone(), catalog_transport);
        let fetcher = ArchiveFetcher::new(download_transport, unarchiver);

        Ok(Self::new(
            Resolver::new(catalog),
            CacheStore::new(cache_root, fetcher)?,
        ))
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Find the binary a request refers to without downloading anything
    pub fn resolve(&self, request: &RuntimeRequest) -> RtfetchResult<Option<BinaryDescriptor>> {
        let Platform { os, arch } = &request.platform;
        match &request.version {
            VersionSpec::Exact(version) => {
                self.resolver
                    .resolve(version, os, arch, &request.implementation)
            }
            VersionSpec::Latest(major) => {
                self.resolver
                    .resolve_latest(*major, os, arch, &request.implementation)
            }
        }
    }

    /// Resolve a request and return the local runtime path, fetching on a cache miss.
    ///
    /// `Ok(None)` means the catalog has no such runtime.
    pub fn provision(&self, request: &RuntimeRequest) -> RtfetchResult<Option<PathBuf>> {
        let Some(descriptor) = self.resolve(request)? else {
            info!("No {} runtime for {}", request.version, request.platform);
            return Ok(None);
        };

        self.store.materialize(&descriptor).map(Some)
    }
}
