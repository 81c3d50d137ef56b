//! Local runtime cache
//!
//! Extracted runtimes live under a single cache root:
//!
//! ```text
//! <root>/
//!   OpenJDK11U-jdk_x64_linux_hotspot_11.0.2_9/   <- entry, named after the archive
//!     jdk-11.0.2+9/                              <- runtime path handed to callers
//!   .staging-AbC123/                             <- extraction in progress
//! ```
//!
//! # Cache States
//!
//! | State | On disk | Behavior |
//! |-------|---------|----------|
//! | Miss | no entry directory | fetch under the global lock |
//! | Hit | entry directory exists | returned without any network access |
//!
//! Entries are never modified or removed once created.

pub mod entry;
pub mod store;

pub use entry::{cache_dir_name, format_bytes, list_entries, runtime_path, CachedRuntime};
pub use store::CacheStore;
