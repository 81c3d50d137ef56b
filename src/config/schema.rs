//! Configuration schema for rtfetch
//!
//! Configuration is stored at `~/.config/rtfetch/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default AdoptOpenJDK v2 release catalog
pub const DEFAULT_CATALOG_URL: &str = "https://api.adoptopenjdk.net/v2/info/releases";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Release catalog settings
    pub catalog: CatalogConfig,

    /// Runtime cache settings
    pub cache: CacheConfig,

    /// HTTP transport settings
    pub http: HttpConfig,

    /// Target platform overrides
    pub platform: PlatformConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Release catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the releases endpoint (without the `/openjdk<N>` suffix)
    pub url: String,

    /// JVM implementation tag (hotspot, openj9)
    pub implementation: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            implementation: "hotspot".to_string(),
        }
    }
}

/// Runtime cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root (defaults to the platform cache directory)
    pub dir: Option<PathBuf>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Timeout for catalog queries in seconds (0 = none)
    pub catalog_timeout_secs: u64,

    /// Timeout for a whole artifact download in seconds (0 = none)
    pub download_timeout_secs: u64,

    /// Proxy URL, e.g. http://proxy:3128 or socks5://proxy:1080
    pub proxy: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("rtfetch/", env!("CARGO_PKG_VERSION")).to_string(),
            catalog_timeout_secs: 30,
            download_timeout_secs: 900,
            proxy: None,
        }
    }
}

/// Target platform overrides. Unset values fall back to the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Catalog OS name (linux, mac, windows, aix, solaris)
    pub os: Option<String>,

    /// Catalog architecture name (x64, x32, aarch64, arm, ppc64le, s390x)
    pub arch: Option<String>,
}
