//! Resolve command - show the catalog binary for a version

use super::{runtime_request, EXIT_NOT_FOUND};
use crate::cache::runtime_path;
use crate::catalog::BinaryDescriptor;
use crate::cli::args::{OutputFormat, ResolveArgs};
use crate::config::Config;
use crate::error::RtfetchResult;
use crate::provision::Provisioner;
use console::style;
use std::path::Path;
use std::process::ExitCode;

/// Execute the resolve command
pub fn execute(args: ResolveArgs, config: &Config, cache_root: &Path) -> RtfetchResult<ExitCode> {
    let request = runtime_request(&args.runtime, config)?;
    let provisioner = Provisioner::from_config(config, cache_root)?;

    let Some(descriptor) = provisioner.resolve(&request)? else {
        eprintln!(
            "{} No {} runtime {} for {}",
            style("!").yellow(),
            request.implementation,
            request.version,
            request.platform
        );
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    };

    let store = provisioner.store();
    let entry = store.entry_dir(&descriptor)?;
    let runtime = runtime_path(&entry, descriptor.version());
    let cached = store.is_cached(&descriptor);

    match args.format {
        OutputFormat::Table => print_table(&descriptor, &runtime, cached),
        OutputFormat::Json => print_json(&descriptor, &runtime, cached)?,
        OutputFormat::Plain => println!("{}", descriptor.link),
    }

    Ok(ExitCode::SUCCESS)
}

fn print_table(descriptor: &BinaryDescriptor, runtime: &Path, cached: bool) {
    let state = if cached {
        style("cached").green().to_string()
    } else {
        style("not cached").dim().to_string()
    };

    println!("{:<10} {}", "FILE", descriptor.file_name);
    println!("{:<10} {}", "VERSION", descriptor.version());
    println!("{:<10} {}-{}", "PLATFORM", descriptor.platform, descriptor.arch);
    println!("{:<10} {}", "LINK", descriptor.link);
    println!("{:<10} {} ({})", "PATH", runtime.display(), state);
}

fn print_json(descriptor: &BinaryDescriptor, runtime: &Path, cached: bool) -> RtfetchResult<()> {
    #[derive(serde::Serialize)]
    struct ResolvedJson<'a> {
        #[serde(flatten)]
        binary: &'a BinaryDescriptor,
        path: String,
        cached: bool,
    }

    let json = ResolvedJson {
        binary: descriptor,
        path: runtime.display().to_string(),
        cached,
    };

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
