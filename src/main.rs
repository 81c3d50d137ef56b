//! rtfetch - JDK runtime resolver and cache
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use rtfetch::cli::{Cli, Commands};
use rtfetch::config::ConfigManager;
use rtfetch::error::RtfetchResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {} {}", style("caused by:").dim(), cause);
                source = cause.source();
            }
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> RtfetchResult<ExitCode> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Loaded configuration from {}", config_manager.path().display());

    let cache_root = config.cache_root(cli.cache_dir.as_deref())?;

    match cli.command {
        Commands::Fetch(args) => rtfetch::cli::commands::fetch(args, &config, &cache_root),
        Commands::Resolve(args) => rtfetch::cli::commands::resolve(args, &config, &cache_root),
        Commands::Cache(args) => {
            rtfetch::cli::commands::cache(args, &cache_root).map(|()| ExitCode::SUCCESS)
        }
        Commands::Config(args) => rtfetch::cli::commands::config(args, &config, &config_manager)
            .map(|()| ExitCode::SUCCESS),
    }
}

/// 0 = warn, 1 = info, 2+ = debug. Logs go to stderr.
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("rtfetch=warn"),
        1 => EnvFilter::new("rtfetch=info"),
        _ => EnvFilter::new("rtfetch=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
