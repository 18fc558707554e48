//! Connection state watcher.

use std::sync::Arc;
use std::time::Duration;

use common::TerminalPaths;
use file_watch::{
    await_any, CorrelateError, EventHub, FilePoller, PollerConfig, RawObservation, FILE_MODIFIED,
};
use parking_lot::RwLock;
use terminal_core::{ConnectionStatus, ConnectionUpdate};
use tracing::trace;

use crate::{STATE_POLL_PERIOD, UPDATE};

struct Inner {
    hub: EventHub<ConnectionUpdate>,
    /// Last accepted raw token. Unrecognized tokens are recorded too; only
    /// the recognized ones get a status-specific event.
    state: RwLock<Option<String>>,
}

impl Inner {
    fn on_modified(&self, text: &str) {
        let token = text.trim();
        if token.is_empty() {
            return;
        }

        {
            let mut state = self.state.write();
            if state.as_deref() == Some(token) {
                return;
            }
            *state = Some(token.to_string());
        }

        let update = ConnectionUpdate {
            connected: token == ConnectionStatus::Connected.as_token(),
        };
        match ConnectionStatus::from_token(token) {
            Some(status) => self.hub.emit(status.as_token(), &update),
            None => trace!(token, "unrecognized connection token"),
        }
        self.hub.emit(UPDATE, &update);
    }
}

/// Watches a per-connection status file and reports connectivity changes.
///
/// Emits the literal status token (`CONNECTED` / `DISCONNECTED`) as a
/// status-specific event plus a generic [`UPDATE`] carrying the boolean.
pub struct ConnectionWatcher {
    connection: String,
    inner: Arc<Inner>,
    poller: FilePoller,
}

impl ConnectionWatcher {
    /// Create a watcher over `outgoing/<connection>.txt` and start polling.
    pub fn new(paths: &TerminalPaths, connection: impl Into<String>) -> Self {
        Self::with_period(paths, connection, STATE_POLL_PERIOD)
    }

    /// Create a watcher with an explicit poll period.
    pub fn with_period(
        paths: &TerminalPaths,
        connection: impl Into<String>,
        period: Duration,
    ) -> Self {
        let connection = connection.into();
        let inner = Arc::new(Inner {
            hub: EventHub::new(),
            state: RwLock::new(None),
        });

        // Subscribe before the first tick so no observation can be missed.
        let poller = FilePoller::new(
            PollerConfig::new(paths.connection_status_file(&connection))
                .with_period(period)
                .with_autostart(false),
        );
        let parser = Arc::clone(&inner);
        poller.hub().subscribe(FILE_MODIFIED, move |raw: &RawObservation| {
            parser.on_modified(&raw.text);
        });
        poller.start();

        Self {
            connection,
            inner,
            poller,
        }
    }

    /// The connection name this watcher tracks.
    pub fn connection(&self) -> &str {
        &self.connection
    }

    /// True iff the last accepted token was `CONNECTED`.
    pub fn connected(&self) -> bool {
        self.inner.state.read().as_deref() == Some(ConnectionStatus::Connected.as_token())
    }

    /// The hub connectivity events are emitted on.
    pub fn hub(&self) -> &EventHub<ConnectionUpdate> {
        &self.inner.hub
    }

    /// The underlying poller.
    pub fn poller(&self) -> &FilePoller {
        &self.poller
    }

    /// Stop the underlying poller.
    pub fn stop(&self) {
        self.poller.stop();
    }

    /// Await the `CONNECTED` event.
    pub async fn wait_connected(&self, timeout: Duration) -> Result<(), CorrelateError> {
        await_any(
            &self.inner.hub,
            &[ConnectionStatus::Connected.as_token()],
            timeout,
        )
        .await
        .map(|_| ())
    }

    /// Await the `DISCONNECTED` event.
    pub async fn wait_disconnected(&self, timeout: Duration) -> Result<(), CorrelateError> {
        await_any(
            &self.inner.hub,
            &[ConnectionStatus::Disconnected.as_token()],
            timeout,
        )
        .await
        .map(|_| ())
    }
}
