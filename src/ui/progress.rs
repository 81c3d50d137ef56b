//! Progress indicators with CI fallback

use super::context::UiContext;
use crate::transport::{Transport, TransportError};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    /// Start the spinner with a message
    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            eprintln!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else if self.interactive {
            eprintln!("{} {}", style("✓").green(), message);
        } else {
            eprintln!("{} {}", style("[OK]").green(), message);
        }
    }

    /// Stop with warning message
    pub fn stop_warn(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(message);
        } else if self.interactive {
            eprintln!("{} {}", style("!").yellow(), message);
        } else {
            eprintln!("{} {}", style("[WARN]").yellow(), message);
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(message);
        } else if self.interactive {
            eprintln!("{} {}", style("✗").red(), message);
        } else {
            eprintln!("{} {}", style("[FAIL]").red(), message);
        }
    }
}

/// Transport decorator that reports download progress.
///
/// Content length is not part of the transport contract, so the bar shows
/// transferred bytes and throughput rather than a percentage.
pub struct ProgressTransport {
    inner: Arc<dyn Transport>,
    interactive: bool,
}

impl ProgressTransport {
    pub fn new(ctx: &UiContext, inner: Arc<dyn Transport>) -> Self {
        Self {
            inner,
            interactive: ctx.use_fancy_output(),
        }
    }
}

impl Transport for ProgressTransport {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, TransportError> {
        let body = self.inner.get(url)?;
        if !self.interactive {
            return Ok(body);
        }

        let name = url.rsplit('/').next().unwrap_or(url).to_string();
        let bar = ProgressBar::new_spinner();
        if let Ok(bar_style) = ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} Downloading {msg}  {bytes:.bold} {bytes_per_sec:.dim}  {elapsed:.dim}")
        {
            bar.set_style(bar_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }
        bar.set_message(name);
        bar.enable_steady_tick(Duration::from_millis(120));

        Ok(Box::new(ProgressReader { inner: body, bar }))
    }
}

/// Advances a progress bar as bytes are read and clears it at end of stream
struct ProgressReader {
    inner: Box<dyn Read>,
    bar: ProgressBar,
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            self.bar.finish_and_clear();
        } else {
            self.bar.inc(n as u64);
        }
        Ok(n)
    }
}

impl Drop for ProgressReader {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
