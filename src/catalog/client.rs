//! Release catalog client
//!
//! Issues exactly one GET per query and decodes the JSON body. No caching
//! and no retries happen here.

use super::model::ReleaseCatalogEntry;
use crate::error::{RtfetchError, RtfetchResult};
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Stateless client for an AdoptOpenJDK v2 style catalog
#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl CatalogClient {
    /// `base_url` is the releases endpoint, e.g. `https://api.adoptopenjdk.net/v2/info/releases`
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// All releases of a major version for the given implementation and platform
    pub fn fetch_releases_by_major(
        &self,
        major: u32,
        implementation: &str,
        platform: &str,
        arch: &str,
    ) -> RtfetchResult<Vec<ReleaseCatalogEntry>> {
        let url = self.releases_url(major, implementation, platform, arch, false);
        let releases: Vec<ReleaseCatalogEntry> = self.get_json(&url)?;
        debug!("Catalog returned {} releases for openjdk{}", releases.len(), major);
        Ok(releases)
    }

    /// The newest release of a major version
    pub fn fetch_latest_release(
        &self,
        major: u32,
        implementation: &str,
        platform: &str,
        arch: &str,
    ) -> RtfetchResult<ReleaseCatalogEntry> {
        let url = self.releases_url(major, implementation, platform, arch, true);
        let release: ReleaseCatalogEntry = self.get_json(&url)?;
        debug!("Latest openjdk{} release is {}", major, release.name);
        Ok(release)
    }

    fn releases_url(
        &self,
        major: u32,
        implementation: &str,
        platform: &str,
        arch: &str,
        latest: bool,
    ) -> String {
        let mut url = format!(
            "{}/openjdk{}?openjdk_impl={}&os={}&arch={}&type=jdk",
            self.base_url, major, implementation, platform, arch
        );
        if latest {
            url.push_str("&release=latest");
        }
        url
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> RtfetchResult<T> {
        let body = self
            .transport
            .get(url)
            .map_err(|e| RtfetchError::CatalogUnavailable {
                url: url.to_string(),
                reason: e.reason,
            })?;

        serde_json::from_reader(body).map_err(|e| {
            // A read error mid-body is the connection failing, not a bad payload
            if e.is_io() {
                RtfetchError::CatalogUnavailable {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            } else {
                RtfetchError::CatalogMalformed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })
    }
}
