//! Error types for rtfetch
//!
//! All modules use `RtfetchResult<T>` as their return type. A release that
//! simply does not exist is never an error: resolvers return `Ok(None)`.

use crate::archive::ArchiveError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for rtfetch operations
pub type RtfetchResult<T> = Result<T, RtfetchError>;

/// All errors that can occur in rtfetch
#[derive(Error, Debug)]
pub enum RtfetchError {
    // Catalog errors
    #[error("Release catalog unavailable at {url}: {reason}")]
    CatalogUnavailable { url: String, reason: String },

    #[error("Release catalog returned an unexpected response from {url}: {reason}")]
    CatalogMalformed { url: String, reason: String },

    #[error("Invalid runtime version '{0}': expected a version starting with a number")]
    InvalidVersion(String),

    // Retrieval errors
    #[error("Download failed for {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Catalog archive name '{0}' cannot name a cache entry")]
    InvalidArchiveName(String),

    #[error("Failed to extract {}", archive.display())]
    ExtractionFailed {
        archive: PathBuf,
        #[source]
        source: ArchiveError,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid proxy '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },

    #[error("Cannot determine a cache directory for this platform")]
    NoCacheDir,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl RtfetchError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether repeating the same call may succeed.
    ///
    /// Nothing inside rtfetch retries; this is for callers deciding their own policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CatalogUnavailable { .. } | Self::DownloadFailed { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CatalogUnavailable { .. } | Self::DownloadFailed { .. } => {
                Some("Check your network connection or set http.proxy in the config")
            }
            Self::CatalogMalformed { .. } => {
                Some("Check that catalog.url points at an AdoptOpenJDK v2 compatible API")
            }
            Self::InvalidVersion(_) => Some("Use a version such as 11, 11.0.2 or 1.8.0_202"),
            Self::NoCacheDir => Some("Pass --cache-dir or set cache.dir in the config"),
            Self::InvalidArchiveName(_) => {
                Some("Check that catalog.url points at a trusted release catalog")
            }
            _ => None,
        }
    }
}
