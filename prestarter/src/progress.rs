//! Byte counters shared between a running download and its progress readout.
use crate::reporter::StatusReporter;
use crate::utils::channel::{EventPublisher, pub_sub};
use crate::utils::threads::spawn_named_thread;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, trace};

const PROGRESS_WATCHER_THREAD_NAME: &str = "progress-watcher";

/// Bytes transferred by a single download.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    /// Expected size, when the server announced one.
    pub total: Option<u64>,
    pub transferred: u64,
}

impl DownloadProgress {
    /// Completed fraction in `[0, 1]`. Unknown or zero totals report 0.
    pub fn fraction(&self) -> f64 {
        match self.total {
            Some(total) if total > 0 => (self.transferred as f64 / total as f64).min(1.0),
            _ => 0.0,
        }
    }
}

/// [DownloadProgress] behind a mutex. Every read and write takes the lock since the writer
/// (the streaming copy) and the reader (the progress watcher) run on different threads.
#[derive(Debug, Default, Clone)]
pub struct SharedProgress(Arc<Mutex<DownloadProgress>>);

impl SharedProgress {
    pub fn reset(&self, total: Option<u64>) {
        *self.lock() = DownloadProgress {
            total,
            transferred: 0,
        };
    }

    pub fn advance(&self, bytes: u64) {
        let mut progress = self.lock();
        progress.transferred = progress.transferred.saturating_add(bytes);
    }

    pub fn snapshot(&self) -> DownloadProgress {
        *self.lock()
    }

    // A panic while holding the lock cannot leave a counter half written.
    fn lock(&self) -> MutexGuard<'_, DownloadProgress> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Background thread periodically forwarding a [SharedProgress] to a [StatusReporter].
///
/// The watcher stops when [ProgressWatcher::stop] is called or when it is dropped, reporting
/// the last known value one final time.
pub struct ProgressWatcher {
    stop_publisher: EventPublisher<()>,
    join_handle: Option<JoinHandle<()>>,
}

impl ProgressWatcher {
    pub fn start(
        progress: SharedProgress,
        reporter: Arc<dyn StatusReporter>,
        interval: Duration,
    ) -> io::Result<Self> {
        let (stop_publisher, stop_consumer) = pub_sub::<()>();

        let join_handle = spawn_named_thread(PROGRESS_WATCHER_THREAD_NAME, move || {
            // Timeouts are ticks, a stop event or a dropped publisher ends the loop.
            while let Ok(None) = stop_consumer.recv_timeout(interval) {
                reporter.report_progress(progress.snapshot().fraction());
            }
            reporter.report_progress(progress.snapshot().fraction());
            trace!("progress watcher finished");
        })?;

        Ok(Self {
            stop_publisher,
            join_handle: Some(join_handle),
        })
    }

    pub fn stop(self) {
        drop(self)
    }
}

impl Drop for ProgressWatcher {
    fn drop(&mut self) {
        let _ = self.stop_publisher.publish(());
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                error!("the progress watcher thread panicked");
            }
        }
    }
}
