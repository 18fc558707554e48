//! Generic file polling and event plumbing.
//!
//! Three pieces compose here:
//!
//! - **`EventHub`**: named-event publish/subscribe with ordered, synchronous
//!   subscriber invocation
//! - **`FilePoller`**: watches one path on a fixed period and emits the raw
//!   file text whenever the modification timestamp moves strictly forward
//! - **Correlation**: `await_any`/`await_event` bridge a fired event into an
//!   awaited value, bounded by a timeout
//!
//! Specialized watchers subscribe to a poller's hub, parse the raw text, and
//! re-emit typed events on their own hub; callers then await those events
//! through the correlator.

mod correlate;
mod hub;
mod poller;

pub use correlate::{await_any, await_event, CorrelateError, DEFAULT_EVENT_TIMEOUT};
pub use hub::{EventHub, SubscriptionId};
pub use poller::{FilePoller, PollerConfig, RawObservation, DEFAULT_POLL_PERIOD, FILE_MODIFIED};
