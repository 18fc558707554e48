//! Specialized state watchers.
//!
//! Three watchers built on `file-watch`, one per status-file kind the
//! terminal maintains:
//!
//! - **`ConnectionWatcher`**: `outgoing/<connection>.txt`, bare status token
//! - **`OrderWatcher`**: `outgoing/<account>_<orderId>.txt`, `status;quantity;price`
//! - **`PositionWatcher`**: `outgoing/<instrument> Default_<account>_position.txt`,
//!   `side;quantity;price`
//!
//! All three share one contract: an observation is accepted and emitted iff
//! it differs from the immediately preceding accepted state in at least one
//! field, or no prior state exists. Identical repeated reads are suppressed,
//! state is replaced wholesale, and a garbled payload never reverts or
//! corrupts the held state.

use std::time::Duration;

mod connection;
mod order;
mod position;

pub use connection::ConnectionWatcher;
pub use order::OrderWatcher;
pub use position::PositionWatcher;

/// Generic update event name, emitted alongside any status-specific event.
pub const UPDATE: &str = "UPDATE";

/// Poll period for status files, matching the cadence the terminal
/// rewrites them at.
pub const STATE_POLL_PERIOD: Duration = Duration::from_millis(100);
