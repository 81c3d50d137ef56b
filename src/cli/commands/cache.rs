//! Cache command - inspect cached runtimes

use crate::cache::{format_bytes, list_entries, CachedRuntime};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::error::RtfetchResult;
use std::path::Path;

/// Execute the cache command
pub fn execute(args: CacheArgs, cache_root: &Path) -> RtfetchResult<()> {
    match args.action {
        CacheAction::Path => {
            println!("{}", cache_root.display());
            Ok(())
        }
        CacheAction::List { format } => list_runtimes(cache_root, format),
    }
}

fn list_runtimes(cache_root: &Path, format: OutputFormat) -> RtfetchResult<()> {
    let runtimes = list_entries(cache_root)?;

    if runtimes.is_empty() && !matches!(format, OutputFormat::Json) {
        println!("No cached runtimes in {}", cache_root.display());
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&runtimes),
        OutputFormat::Json => print_json(&runtimes)?,
        OutputFormat::Plain => {
            for runtime in &runtimes {
                println!("{}", runtime.path.display());
            }
        }
    }

    Ok(())
}

fn print_table(runtimes: &[CachedRuntime]) {
    println!("{:<60} {:>10}", "RUNTIME", "SIZE");
    println!("{}", "-".repeat(71));

    for runtime in runtimes {
        println!("{:<60} {:>10}", runtime.name, format_bytes(runtime.size_bytes));
    }

    let total: u64 = runtimes.iter().map(|r| r.size_bytes).sum();
    println!();
    println!("Total: {} runtime(s), {}", runtimes.len(), format_bytes(total));
}

fn print_json(runtimes: &[CachedRuntime]) -> RtfetchResult<()> {
    #[derive(serde::Serialize)]
    struct RuntimeJson {
        name: String,
        path: String,
        size_bytes: u64,
    }

    let json: Vec<RuntimeJson> = runtimes
        .iter()
        .map(|r| RuntimeJson {
            name: r.name.clone(),
            path: r.path.display().to_string(),
            size_bytes: r.size_bytes,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
