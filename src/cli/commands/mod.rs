//! CLI command implementations

pub mod cache;
pub mod config;
pub mod fetch;
pub mod resolve;

pub use cache::execute as cache;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use resolve::execute as resolve;

use crate::cli::args::RuntimeArgs;
use crate::config::Config;
use crate::error::RtfetchResult;
use crate::platform::Platform;
use crate::provision::{RuntimeRequest, VersionSpec};
use crate::resolve::major_version;

/// Exit code when the catalog has no matching runtime
pub const EXIT_NOT_FOUND: u8 = 2;

/// Build a runtime request: CLI flags, then config, then host detection
pub fn runtime_request(args: &RuntimeArgs, config: &Config) -> RtfetchResult<RuntimeRequest> {
    let version = if args.latest {
        VersionSpec::Latest(major_version(&args.version)?)
    } else {
        VersionSpec::Exact(args.version.trim().to_string())
    };

    let platform = Platform::from_config(&config.platform)
        .with_overrides(args.os.as_deref(), args.arch.as_deref());

    let implementation = args
        .implementation
        .clone()
        .unwrap_or_else(|| config.catalog.implementation.clone());

    Ok(RuntimeRequest {
        version,
        platform,
        implementation,
    })
}
