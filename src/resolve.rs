//! Release resolution
//!
//! Picks one binary out of catalog results. Finding nothing is a normal
//! outcome and comes back as `Ok(None)`; only catalog failures are errors.

use crate::catalog::{BinaryDescriptor, CatalogClient};
use crate::error::{RtfetchError, RtfetchResult};
use tracing::{debug, info};

/// Derive the major version a catalog query is keyed on.
///
/// Takes the leading integer (`11.0.2` -> 11, `8u202` -> 8). Legacy
/// `1.N` version strings map to `N` (`1.8.0_202` -> 8).
pub fn major_version(version: &str) -> RtfetchResult<u32> {
    let leading = |s: &str| -> Option<u32> {
        let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        s[..end].parse().ok()
    };

    let version = version.trim();
    let major = leading(version).ok_or_else(|| RtfetchError::InvalidVersion(version.to_string()))?;

    if major == 1 {
        if let Some(rest) = version.strip_prefix("1.") {
            if let Some(legacy) = leading(rest) {
                return Ok(legacy);
            }
        }
    }

    Ok(major)
}

/// Resolves requested versions against the release catalog
#[derive(Clone)]
pub struct Resolver {
    catalog: CatalogClient,
}

impl Resolver {
    pub fn new(catalog: CatalogClient) -> Self {
        Self { catalog }
    }

    /// Find the binary of exactly `version` for `platform`/`arch`.
    ///
    /// `version` is compared verbatim with the token in each release name
    /// (`jdk-11.0.2+9` carries `11.0.2`). The first matching release and the
    /// first matching binary inside it win.
    pub fn resolve(
        &self,
        version: &str,
        platform: &str,
        arch: &str,
        implementation: &str,
    ) -> RtfetchResult<Option<BinaryDescriptor>> {
        let major = major_version(version)?;
        let releases = self
            .catalog
            .fetch_releases_by_major(major, implementation, platform, arch)?;

        for release in &releases {
            if release.version_token() != Some(version) {
                continue;
            }

            if let Some(binary) = release.binary_for(platform, arch) {
                info!("Resolved {} to {}", version, binary.file_name);
                return Ok(Some(binary.clone()));
            }
            debug!("Release {} has no {}/{} binary", release.name, platform, arch);
        }

        debug!(
            "No release matches {} among {} openjdk{} releases",
            version,
            releases.len(),
            major
        );
        Ok(None)
    }

    /// Find the newest binary of a major version for `platform`/`arch`
    pub fn resolve_latest(
        &self,
        major: u32,
        platform: &str,
        arch: &str,
        implementation: &str,
    ) -> RtfetchResult<Option<BinaryDescriptor>> {
        let release = self
            .catalog
            .fetch_latest_release(major, implementation, platform, arch)?;

        let binary = release.binary_for(platform, arch).cloned();
        match &binary {
            Some(b) => info!("Latest openjdk{} is {}", major, b.file_name),
            None => debug!("Release {} has no {}/{} binary", release.name, platform, arch),
        }
        Ok(binary)
    }
}
