//! Logging and console reporting for the signal watcher.

mod logging;
mod report;

pub use logging::setup_logging;
pub use report::{format_tick, report_tick};
