//! Narrow presentation seam of the bootstrap.
//!
//! The provisioning pipeline only ever talks to a presentation layer through [StatusReporter],
//! so it can run headless, behind a GUI or in tests with no presentation at all.
use tracing::{debug, info};

/// Receives human readable status lines and download/extraction progress.
///
/// Implementations are called from the pipeline thread and from the background progress
/// watcher, hence the `Send + Sync` bound.
pub trait StatusReporter: Send + Sync {
    fn report_status(&self, status: &str);

    /// `fraction` is always within `[0, 1]`.
    fn report_progress(&self, fraction: f64);
}

/// Reports everything through the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report_status(&self, status: &str) {
        info!("{status}");
    }

    fn report_progress(&self, fraction: f64) {
        debug!("Progress: {:.0}%", fraction * 100.0);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl StatusReporter for NoopReporter {
    fn report_status(&self, _status: &str) {}

    fn report_progress(&self, _fraction: f64) {}
}
