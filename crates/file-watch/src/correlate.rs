//! Awaitable bridge from named events to values.
//!
//! Turns "write a command, then wait for the terminal's reaction in a status
//! file" into one bounded-latency operation: subscribe to a set of event
//! names, resolve with the first payload that fires, or fail on timeout.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::hub::{EventHub, SubscriptionId};

/// Default time to wait for a correlated event.
pub const DEFAULT_EVENT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Failure surfaced by [`await_any`].
#[derive(Debug, Error)]
pub enum CorrelateError {
    /// None of the awaited events fired in time.
    #[error("timed out after {timeout_ms}ms waiting for [{events}]")]
    Timeout {
        /// Comma-joined names of the events that were awaited.
        events: String,
        timeout_ms: u64,
    },

    /// The event source went away before any event fired.
    #[error("event source closed")]
    SourceClosed,
}

impl CorrelateError {
    /// Check if this is the timeout outcome.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Await the first of `events` fired on `hub`, or fail after `timeout`.
///
/// Exactly one of {resolved payload, timeout error} is returned, and every
/// subscription made by this call is removed before it returns — neither
/// outcome leaks listeners, and a payload arriving after the race is decided
/// is ignored.
pub async fn await_any<E>(
    hub: &EventHub<E>,
    events: &[&str],
    timeout: Duration,
) -> Result<E, CorrelateError>
where
    E: Clone + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<E>(1);

    let subscriptions: Vec<(String, SubscriptionId)> = events
        .iter()
        .map(|event| {
            let tx = tx.clone();
            let id = hub.subscribe(event, move |payload: &E| {
                // First event wins; a full channel means the race is decided.
                let _ = tx.try_send(payload.clone());
            });
            (event.to_string(), id)
        })
        .collect();
    drop(tx);

    let outcome = tokio::time::timeout(timeout, rx.recv()).await;

    for (event, id) in &subscriptions {
        hub.unsubscribe(event, *id);
    }

    match outcome {
        Ok(Some(payload)) => Ok(payload),
        Ok(None) => Err(CorrelateError::SourceClosed),
        Err(_) => Err(CorrelateError::Timeout {
            events: events.join(", "),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Single-event convenience over [`await_any`].
pub async fn await_event<E>(
    hub: &EventHub<E>,
    event: &str,
    timeout: Duration,
) -> Result<E, CorrelateError>
where
    E: Clone + Send + 'static,
{
    await_any(hub, &[event], timeout).await
}
