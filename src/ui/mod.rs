//! Terminal output helpers
//!
//! Spinners and download progress in interactive terminals, plain
//! `[OK]`/`[WARN]` lines in CI. All of it goes to stderr so stdout stays
//! machine-readable.

mod context;
mod progress;

pub use context::UiContext;
pub use progress::{ProgressTransport, TaskSpinner};
