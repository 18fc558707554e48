//! Order state watcher.

use std::sync::Arc;
use std::time::Duration;

use common::TerminalPaths;
use file_watch::{
    await_any, CorrelateError, EventHub, FilePoller, PollerConfig, RawObservation, FILE_MODIFIED,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use terminal_core::{OrderStatus, OrderUpdate};
use tracing::debug;

use crate::{STATE_POLL_PERIOD, UPDATE};

struct Inner {
    hub: EventHub<OrderUpdate>,
    state: RwLock<Option<OrderUpdate>>,
}

impl Inner {
    fn on_modified(&self, text: &str) {
        let Some(update) = parse_order_line(text) else {
            return;
        };

        {
            let mut state = self.state.write();
            if *state == Some(update) {
                return;
            }
            *state = Some(update);
        }

        self.hub.emit(update.status.as_token(), &update);
        self.hub.emit(UPDATE, &update);
    }
}

/// Parse a `status;quantity;price` line.
///
/// A tick is dropped when any of the three fields is missing or empty
/// (incomplete or garbled write), when the status token is unknown, or when
/// quantity/price fail decimal parsing.
fn parse_order_line(text: &str) -> Option<OrderUpdate> {
    let trimmed = text.trim();
    let mut fields = trimmed.split(';');

    let (status, quantity, price) = match (fields.next(), fields.next(), fields.next()) {
        (Some(status), Some(quantity), Some(price))
            if !status.is_empty() && !quantity.is_empty() && !price.is_empty() =>
        {
            (status, quantity, price)
        }
        _ => {
            debug!(payload = trimmed, "dropping incomplete order payload");
            return None;
        }
    };

    let Some(status) = OrderStatus::from_token(status) else {
        debug!(token = status, "dropping order payload with unknown status");
        return None;
    };
    let (Ok(quantity), Ok(price)) = (quantity.parse::<Decimal>(), price.parse::<Decimal>())
    else {
        debug!(payload = trimmed, "dropping order payload with non-numeric fields");
        return None;
    };

    Some(OrderUpdate {
        status,
        quantity,
        price,
    })
}

/// Watches a per-order status file and reports lifecycle changes.
///
/// Every accepted observation is emitted twice: once under the literal status
/// token (`WORKING`, `FILLED`, ...) and once under the generic [`UPDATE`],
/// both carrying the same `{status, quantity, price}` payload. The watcher
/// purely reports; the terminal is the transition authority.
pub struct OrderWatcher {
    account: String,
    order_id: String,
    inner: Arc<Inner>,
    poller: FilePoller,
}

impl OrderWatcher {
    /// Create a watcher over `outgoing/<account>_<order_id>.txt` and start
    /// polling. Construct the watcher before writing the command that the
    /// status file will react to.
    pub fn new(
        paths: &TerminalPaths,
        account: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self::with_period(paths, account, order_id, STATE_POLL_PERIOD)
    }

    /// Create a watcher with an explicit poll period.
    pub fn with_period(
        paths: &TerminalPaths,
        account: impl Into<String>,
        order_id: impl Into<String>,
        period: Duration,
    ) -> Self {
        let account = account.into();
        let order_id = order_id.into();
        let inner = Arc::new(Inner {
            hub: EventHub::new(),
            state: RwLock::new(None),
        });

        // Subscribe before the first tick so no observation can be missed.
        let poller = FilePoller::new(
            PollerConfig::new(paths.order_status_file(&account, &order_id))
                .with_period(period)
                .with_autostart(false),
        );
        let parser = Arc::clone(&inner);
        poller.hub().subscribe(FILE_MODIFIED, move |raw: &RawObservation| {
            parser.on_modified(&raw.text);
        });
        poller.start();

        Self {
            account,
            order_id,
            inner,
            poller,
        }
    }

    /// The account the watched order belongs to.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The client order ID this watcher tracks.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Last accepted state, if any observation has been accepted yet.
    pub fn state(&self) -> Option<OrderUpdate> {
        *self.inner.state.read()
    }

    /// Status of the last accepted observation.
    pub fn status(&self) -> Option<OrderStatus> {
        self.inner.state.read().map(|update| update.status)
    }

    /// Last accepted quantity; zero before any observation.
    pub fn quantity(&self) -> Decimal {
        self.inner
            .state
            .read()
            .map(|update| update.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Last accepted price; zero before any observation.
    pub fn price(&self) -> Decimal {
        self.inner
            .state
            .read()
            .map(|update| update.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// The hub order events are emitted on.
    pub fn hub(&self) -> &EventHub<OrderUpdate> {
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

    /// Await the first of `statuses` reported for this order.
    pub async fn wait_for_status(
        &self,
        statuses: &[OrderStatus],
        timeout: Duration,
    ) -> Result<OrderUpdate, CorrelateError> {
        let events: Vec<&str> = statuses.iter().map(OrderStatus::as_token).collect();
        await_any(&self.inner.hub, &events, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;

    fn recording_inner() -> (Arc<Inner>, Arc<Mutex<Vec<(String, OrderUpdate)>>>) {
        let inner = Arc::new(Inner {
            hub: EventHub::new(),
            state: RwLock::new(None),
        });
        let recorded = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&recorded);
        inner.hub.subscribe(UPDATE, move |update: &OrderUpdate| {
            sink.lock().push(("UPDATE".to_string(), *update));
        });
        for token in ["WORKING", "FILLED", "REJECTED"] {
            let sink = Arc::clone(&recorded);
            inner.hub.subscribe(token, move |update: &OrderUpdate| {
                sink.lock().push((token.to_string(), *update));
            });
        }

        (inner, recorded)
    }

    #[test]
    fn test_duplicate_payload_emits_once() {
        let (inner, recorded) = recording_inner();

        inner.on_modified("WORKING;10;101.25");
        inner.on_modified("WORKING;10;101.25");
        inner.on_modified("FILLED;10;101.25");

        let events = recorded.lock();
        let names: Vec<&str> = events.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["WORKING", "UPDATE", "FILLED", "UPDATE"]);

        let working = events[0].1;
        assert_eq!(working.status, OrderStatus::Working);
        assert_eq!(working.quantity, dec!(10));
        assert_eq!(working.price, dec!(101.25));

        // Status-specific and generic events carry the same payload.
        assert_eq!(events[0].1, events[1].1);
        assert_eq!(events[2].1.status, OrderStatus::Filled);
    }

    #[test]
    fn test_field_change_alone_is_accepted() {
        let (inner, recorded) = recording_inner();

        inner.on_modified("WORKING;10;101.25");
        inner.on_modified("WORKING;10;101.50");

        let events = recorded.lock();
        assert_eq!(events.len(), 4);
        assert_eq!(events[3].1.price, dec!(101.50));
    }

    #[test]
    fn test_incomplete_payloads_are_dropped() {
        let (inner, recorded) = recording_inner();

        inner.on_modified("");
        inner.on_modified("FILLED");
        inner.on_modified("FILLED;10");
        inner.on_modified("FILLED;;101.25");
        inner.on_modified(";10;101.25");

        assert!(recorded.lock().is_empty());
        assert!(inner.state.read().is_none());
    }

    #[test]
    fn test_unknown_status_and_bad_numbers_are_dropped() {
        let (inner, recorded) = recording_inner();

        inner.on_modified("BOGUS;10;101.25");
        inner.on_modified("FILLED;ten;101.25");
        inner.on_modified("FILLED;10;lots");

        assert!(recorded.lock().is_empty());
    }

    #[test]
    fn test_garbled_tick_does_not_revert_state() {
        let (inner, _recorded) = recording_inner();

        inner.on_modified("WORKING;10;101.25");
        inner.on_modified("FILLED;;");

        let state = inner.state.read().unwrap();
        assert_eq!(state.status, OrderStatus::Working);
        assert_eq!(state.quantity, dec!(10));
    }

    #[test]
    fn test_signed_quantity_is_preserved() {
        let (inner, _recorded) = recording_inner();
        inner.on_modified("FILLED;-5;99.75");

        let state = inner.state.read().unwrap();
        assert_eq!(state.quantity, dec!(-5));
    }

    #[tokio::test]
    async fn test_accessors_default_to_zero_before_observation() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = TerminalPaths::new(dir.path());

        let watcher = OrderWatcher::new(&paths, "Sim101", "ord-1");
        assert_eq!(watcher.quantity(), Decimal::ZERO);
        assert_eq!(watcher.price(), Decimal::ZERO);
        assert!(watcher.status().is_none());
        watcher.stop();
    }

    #[tokio::test]
    async fn test_watcher_follows_status_file_end_to_end() {
        let dir = tempfile::TempDir::new().unwrap();
        let paths = TerminalPaths::new(dir.path());
        std::fs::create_dir_all(paths.outgoing()).unwrap();

        let watcher =
            OrderWatcher::with_period(&paths, "Sim101", "ord-1", Duration::from_millis(20));
        let status_file = paths.order_status_file("Sim101", "ord-1");

        std::fs::write(&status_file, "WORKING;10;101.25").unwrap();
        let update = watcher
            .wait_for_status(&[OrderStatus::Working], Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(update.quantity, dec!(10));

        // Real time between writes so the mtime moves on coarse filesystems.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        std::fs::write(&status_file, "FILLED;10;101.25").unwrap();
        let update = watcher
            .wait_for_status(
                &[OrderStatus::Filled, OrderStatus::Rejected],
                Duration::from_secs(2),
            )
            .await
            .unwrap();
        assert_eq!(update.status, OrderStatus::Filled);
        assert_eq!(watcher.status(), Some(OrderStatus::Filled));

        watcher.stop();
    }
}
