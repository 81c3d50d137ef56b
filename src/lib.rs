//! rtfetch - JDK runtime resolver and cache
//!
//! Looks up runtime releases in an AdoptOpenJDK-style catalog, downloads
//! each archive once into a local cache and hands back the path of the
//! unpacked runtime.

pub mod archive;
pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod provision;
pub mod resolve;
pub mod transport;
pub mod ui;

pub use error::{RtfetchError, RtfetchResult};
pub use provision::{Provisioner, RuntimeRequest, VersionSpec};
