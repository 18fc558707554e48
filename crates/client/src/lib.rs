//! High-level terminal client.
//!
//! The [`NinjaTrader`] facade ties the lower layers together: it serializes
//! commands through `terminal-core`, writes them into the terminal's
//! `incoming/` directory, and hands out registry-cached state watchers so two
//! lookups of the same order, connection, or position never spawn duplicate
//! pollers on one path.

mod client;
mod error;
mod registry;

pub use client::{ClientOptions, NinjaTrader, OrderSpec, DEFAULT_ACCOUNT};
pub use error::ClientError;
pub use registry::WatcherRegistry;
