//! Fetch command - download a runtime and print its path

use super::{runtime_request, EXIT_NOT_FOUND};
use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::RtfetchResult;
use crate::provision::Provisioner;
use crate::transport::{Transport, UreqTransport};
use crate::ui::{ProgressTransport, TaskSpinner, UiContext};
use console::style;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

/// Execute the fetch command
pub fn execute(args: FetchArgs, config: &Config, cache_root: &Path) -> RtfetchResult<ExitCode> {
    let ctx = UiContext::detect();
    let request = runtime_request(&args.runtime, config)?;

    let catalog: Arc<dyn Transport> = Arc::new(UreqTransport::catalog(&config.http)?);
    let download: Arc<dyn Transport> = Arc::new(ProgressTransport::new(
        &ctx,
        Arc::new(UreqTransport::download(&config.http)?),
    ));
    let provisioner = Provisioner::with_transports(config, cache_root, catalog, download)?;

    // Same two steps as `Provisioner::provision`, split so the spinner is
    // closed before the download progress bar draws.
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!(
        "Resolving {} {} for {}",
        request.implementation, request.version, request.platform
    ));

    let descriptor = match provisioner.resolve(&request) {
        Ok(Some(descriptor)) => descriptor,
        Ok(None) => {
            spinner.stop_warn(&format!(
                "No {} runtime {} for {}",
                request.implementation, request.version, request.platform
            ));
            return Ok(ExitCode::from(EXIT_NOT_FOUND));
        }
        Err(e) => {
            spinner.stop_error("Catalog lookup failed");
            return Err(e);
        }
    };

    let cached = provisioner.store().is_cached(&descriptor);
    spinner.stop(&format!("Resolved {}", descriptor.file_name));

    let path = provisioner.store().materialize(&descriptor)?;
    if !cached {
        eprintln!(
            "{} Installed {} into {}",
            style("✓").green(),
            descriptor.version(),
            provisioner.store().root().display()
        );
    }

    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}
