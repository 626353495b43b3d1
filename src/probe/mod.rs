mod classify;
mod models;
mod preview;
mod printer;
mod runner;

pub use classify::{classify_error_body, ErrorBodyShape};
pub use models::{ProbeConfig, ProbeOutcome, ProbeTarget, DEFAULT_PREVIEW_CHARS};
pub use printer::print_probe_outcome;
pub use runner::{build_url, run_probe, ProbeUrlError};
