//! Host platform detection in release catalog vocabulary

use crate::config::PlatformConfig;
use std::fmt;

/// An (os, arch) pair as named by the release catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for
    pub fn current() -> Self {
        Self::new(host_os(), host_arch())
    }

    /// Apply config overrides on top of host detection
    pub fn from_config(config: &PlatformConfig) -> Self {
        let host = Self::current();
        Self {
            os: config.os.clone().unwrap_or(host.os),
            arch: config.arch.clone().unwrap_or(host.arch),
        }
    }

    /// Apply per-invocation overrides
    pub fn with_overrides(mut self, os: Option<&str>, arch: Option<&str>) -> Self {
        if let Some(os) = os {
            self.os = os.to_string();
        }
        if let Some(arch) = arch {
            self.arch = arch.to_string();
        }
        self
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

fn host_os() -> &'static str {
    if cfg!(target_os = "macos") {
        "mac"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "aix") {
        "aix"
    } else if cfg!(target_os = "solaris") {
        "solaris"
    } else {
        "linux"
    }
}

fn host_arch() -> &'static str {
    if cfg!(target_arch = "aarch64") {
        "aarch64"
    } else if cfg!(target_arch = "x86") {
        "x32"
    } else if cfg!(target_arch = "arm") {
        "arm"
    } else if cfg!(target_arch = "powerpc64") {
        "ppc64le"
    } else if cfg!(target_arch = "s390x") {
        "s390x"
    } else {
        "x64"
    }
}
