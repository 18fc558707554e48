//! Polling file watcher.
//!
//! Watches a single path, reads the full contents whenever the modification
//! timestamp moves strictly forward, and emits the raw text on its hub.
//! Outgoing files may not exist until the terminal creates them, so a missing
//! or unreadable file is a silent no-op retried on the next tick.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::hub::EventHub;

/// Event name a poller emits observed content under.
pub const FILE_MODIFIED: &str = "modified";

/// Default poll period.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(1000);

/// Raw content of the watched file at one tick.
#[derive(Debug, Clone)]
pub struct RawObservation {
    /// Full file text.
    pub text: String,
    /// Modification timestamp that triggered the read.
    pub modified: SystemTime,
}

/// Configuration for a [`FilePoller`].
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Path to watch.
    pub path: PathBuf,
    /// Time between reads.
    pub period: Duration,
    /// Start polling from the constructor.
    pub autostart: bool,
}

impl PollerConfig {
    /// Config with the default period and autostart enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            period: DEFAULT_POLL_PERIOD,
            autostart: true,
        }
    }

    /// Set the poll period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Enable or disable autostart.
    pub fn with_autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }
}

/// Polls one file and emits [`FILE_MODIFIED`] observations on its hub.
///
/// One tokio task per poller; the task performs one immediate read and then
/// one per period, so ticks of the same poller never overlap. Must be
/// constructed inside a tokio runtime when autostart is enabled.
pub struct FilePoller {
    path: PathBuf,
    period: Duration,
    hub: Arc<EventHub<RawObservation>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl FilePoller {
    /// Create a poller; spawns the poll task when `autostart` is set.
    pub fn new(config: PollerConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poller = Self {
            path: config.path,
            period: config.period,
            hub: Arc::new(EventHub::new()),
            shutdown_tx,
            shutdown_rx,
            handle: Mutex::new(None),
        };
        if config.autostart {
            poller.start();
        }
        poller
    }

    /// The hub observations are emitted on.
    pub fn hub(&self) -> &Arc<EventHub<RawObservation>> {
        &self.hub
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Begin polling: one immediate read, then one per period. Idempotent;
    /// a poller that was stopped stays stopped.
    pub fn start(&self) {
        let mut handle = self.handle.lock();
        if handle.is_some() {
            return;
        }

        let path = self.path.clone();
        let period = self.period;
        let hub = Arc::clone(&self.hub);
        let mut shutdown_rx = self.shutdown_rx.clone();

        *handle = Some(tokio::spawn(async move {
            let mut last_modified: Option<SystemTime> = None;
            let mut ticks = tokio::time::interval(period);

            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        poll_once(&path, &hub, &mut last_modified).await;
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            trace!(path = %path.display(), "poller stopped");
                            break;
                        }
                    }
                }
            }
        }));
    }

    /// Stop polling. Idempotent. Once the task observes the signal no further
    /// ticks occur; no final event is guaranteed.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Whether the poll task has been spawned and has not yet exited.
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for FilePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One tick: stat, compare, read, emit.
///
/// The baseline timestamp only advances after a successful read, so a failed
/// read cannot swallow the change it belonged to.
async fn poll_once(
    path: &Path,
    hub: &EventHub<RawObservation>,
    last_modified: &mut Option<SystemTime>,
) {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        // Absent or inaccessible; the terminal may not have created it yet.
        Err(_) => return,
    };
    let modified = match metadata.modified() {
        Ok(modified) => modified,
        Err(_) => return,
    };

    if let Some(last) = *last_modified {
        if modified <= last {
            return;
        }
    }

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) => {
            debug!(path = %path.display(), %err, "read failed, keeping baseline");
            return;
        }
    };

    *last_modified = Some(modified);
    trace!(path = %path.display(), bytes = text.len(), "observed modified content");
    hub.emit(FILE_MODIFIED, &RawObservation { text, modified });
}
