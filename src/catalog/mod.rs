//! Release catalog access
//!
//! The catalog lists runtime releases per major version, each with one
//! binary per (os, architecture) pair:
//!
//! ```text
//! GET {base}/openjdk11?openjdk_impl=hotspot&os=linux&arch=x64&type=jdk
//!     -> [ { release_name: "jdk-11.0.2+9", binaries: [ ... ] }, ... ]
//! GET {base}/openjdk11?...&release=latest
//!     -> { release_name: "jdk-11.0.2+9", binaries: [ ... ] }
//! ```

mod client;
mod model;

pub use client::CatalogClient;
pub use model::{BinaryDescriptor, ReleaseCatalogEntry, VersionData};
