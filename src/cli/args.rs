//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// rtfetch - JDK runtime resolver and cache
///
/// Looks up runtime releases in the release catalog, downloads each one
/// once into a local cache and prints the path of the unpacked runtime.
#[derive(Parser, Debug)]
#[command(name = "rtfetch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "RTFETCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache root directory (overrides cache.dir)
    #[arg(long, global = true, env = "RTFETCH_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download a runtime (if not cached) and print its path
    Fetch(FetchArgs),

    /// Show which catalog binary a version resolves to, without downloading
    Resolve(ResolveArgs),

    /// Inspect the runtime cache
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Runtime selection shared by fetch and resolve
#[derive(Parser, Debug, Clone)]
pub struct RuntimeArgs {
    /// Exact version (e.g. 11.0.2), or a major version with --latest
    #[arg(id = "runtime_version", value_name = "VERSION")]
    pub version: String,

    /// Take the newest release of the major version
    #[arg(long)]
    pub latest: bool,

    /// Target OS in catalog naming (linux, mac, windows, aix, solaris)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture in catalog naming (x64, aarch64, ...)
    #[arg(long)]
    pub arch: Option<String>,

    /// JVM implementation (hotspot, openj9)
    #[arg(long = "impl")]
    pub implementation: Option<String>,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    #[command(flatten)]
    pub runtime: RuntimeArgs,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the cache root directory
    Path,

    /// List cached runtimes
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
