//! Release catalog response shapes

use serde::{Deserialize, Serialize};

/// Number of leading characters in a release name before the version token
/// (the `jdk-` in `jdk-11.0.2+9`).
const RELEASE_NAME_PREFIX_LEN: usize = 4;

/// A named release and its downloadable binaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCatalogEntry {
    /// Release name, e.g. `jdk-11.0.2+9`
    #[serde(rename = "release_name")]
    pub name: String,

    /// Binaries in catalog order
    #[serde(default)]
    pub binaries: Vec<BinaryDescriptor>,
}

impl ReleaseCatalogEntry {
    /// Version token embedded in the release name.
    ///
    /// Everything after the fixed 4-character prefix up to the first `+`.
    /// Names without a `+`, or too short to hold the prefix, carry no token.
    pub fn version_token(&self) -> Option<&str> {
        let plus = self.name.find('+')?;
        self.name.get(RELEASE_NAME_PREFIX_LEN..plus)
    }

    /// First binary built for `platform`/`arch`, in list order
    pub fn binary_for(&self, platform: &str, arch: &str) -> Option<&BinaryDescriptor> {
        self.binaries
            .iter()
            .find(|b| b.platform == platform && b.arch == arch)
    }
}

/// One downloadable artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryDescriptor {
    /// Archive file name, e.g. `OpenJDK11U-jdk_x64_linux_hotspot_11.0.2_9.tar.gz`
    #[serde(rename = "binary_name")]
    pub file_name: String,

    #[serde(rename = "os")]
    pub platform: String,

    #[serde(rename = "architecture")]
    pub arch: String,

    /// Direct download link
    #[serde(rename = "binary_link")]
    pub link: String,

    pub version_data: VersionData,
}

impl BinaryDescriptor {
    /// Full runtime version, e.g. `11.0.2+9`
    pub fn version(&self) -> &str {
        &self.version_data.openjdk_version
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionData {
    pub openjdk_version: String,
}
