//! Watcher registry: one cached watcher per logical key.
//!
//! Watchers own pollers, and pollers own poll tasks; caching by logical key
//! keeps repeated lookups from spawning duplicate pollers on the same path.

use std::sync::Arc;

use common::TerminalPaths;
use dashmap::DashMap;
use state_watch::{ConnectionWatcher, OrderWatcher, PositionWatcher};

/// Thread-safe cache of state watchers keyed by what they watch.
#[derive(Default)]
pub struct WatcherRegistry {
    connections: DashMap<String, Arc<ConnectionWatcher>>,
    orders: DashMap<String, Arc<OrderWatcher>>,
    positions: DashMap<String, Arc<PositionWatcher>>,
}

impl WatcherRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the watcher for a connection name.
    pub fn connection(
        &self,
        paths: &TerminalPaths,
        connection: &str,
    ) -> Arc<ConnectionWatcher> {
        self.connections
            .entry(connection.to_string())
            .or_insert_with(|| Arc::new(ConnectionWatcher::new(paths, connection)))
            .clone()
    }

    /// Get or create the watcher for an account/order pair.
    pub fn order(
        &self,
        paths: &TerminalPaths,
        account: &str,
        order_id: &str,
    ) -> Arc<OrderWatcher> {
        self.orders
            .entry(format!("{account}_{order_id}"))
            .or_insert_with(|| Arc::new(OrderWatcher::new(paths, account, order_id)))
            .clone()
    }

    /// Get or create the watcher for an instrument/account pair.
    pub fn position(
        &self,
        paths: &TerminalPaths,
        instrument: &str,
        account: &str,
    ) -> Arc<PositionWatcher> {
        self.positions
            .entry(format!("{instrument}_{account}"))
            .or_insert_with(|| Arc::new(PositionWatcher::new(paths, instrument, account)))
            .clone()
    }

    /// Stop every cached watcher's poller.
    pub fn stop_all(&self) {
        for watcher in self.connections.iter() {
            watcher.stop();
        }
        for watcher in self.orders.iter() {
            watcher.stop();
        }
        for watcher in self.positions.iter() {
            watcher.stop();
        }
    }

    /// Total number of cached watchers.
    pub fn len(&self) -> usize {
        self.connections.len() + self.orders.len() + self.positions.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
