//! Position state watcher.

use std::sync::Arc;
use std::time::Duration;

use common::TerminalPaths;
use file_watch::{
    await_event, CorrelateError, EventHub, FilePoller, PollerConfig, RawObservation, FILE_MODIFIED,
};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use terminal_core::{MarketPosition, PositionUpdate};
use tracing::debug;

use crate::{STATE_POLL_PERIOD, UPDATE};

struct Inner {
    hub: EventHub<PositionUpdate>,
    state: RwLock<Option<PositionUpdate>>,
}

impl Inner {
    fn on_modified(&self, text: &str) {
        let Some(update) = parse_position_line(text) else {
            return;
        };

        {
            let mut state = self.state.write();
            if *state == Some(update) {
                return;
            }
            *state = Some(update);
        }

        self.hub.emit(UPDATE, &update);
    }
}

/// Parse a `side;quantity;price` line.
///
/// Same strictness as the order parser: missing or empty fields, an unknown
/// side token, or non-numeric quantity/price drop the tick.
fn parse_position_line(text: &str) -> Option<PositionUpdate> {
    let trimmed = text.trim();
    let mut fields = trimmed.split(';');

    let (side, quantity, price) = match (fields.next(), fields.next(), fields.next()) {
        (Some(side), Some(quantity), Some(price))
            if !side.is_empty() && !quantity.is_empty() && !price.is_empty() =>
        {
            (side, quantity, price)
        }
        _ => {
            debug!(payload = trimmed, "dropping incomplete position payload");
            return None;
        }
    };

    let Some(position) = MarketPosition::from_token(side) else {
        debug!(token = side, "dropping position payload with unknown side");
        return None;
    };
    let (Ok(quantity), Ok(price)) = (quantity.parse::<Decimal>(), price.parse::<Decimal>())
    else {
        debug!(payload = trimmed, "dropping position payload with non-numeric fields");
        return None;
    };

    Some(PositionUpdate {
        position,
        quantity,
        price,
    })
}

/// Watches a per-instrument/account position file.
///
/// Emits a single generic [`UPDATE`] event per accepted observation.
pub struct PositionWatcher {
    instrument: String,
    account: String,
    inner: Arc<Inner>,
    poller: FilePoller,
}

impl PositionWatcher {
    /// Create a watcher over
    /// `outgoing/<instrument> Default_<account>_position.txt` and start
    /// polling.
    pub fn new(
        paths: &TerminalPaths,
        instrument: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        Self::with_period(paths, instrument, account, STATE_POLL_PERIOD)
    }

    /// Create a watcher with an explicit poll period.
    pub fn with_period(
        paths: &TerminalPaths,
        instrument: impl Into<String>,
        account: impl Into<String>,
        period: Duration,
    ) -> Self {
        let instrument = instrument.into();
        let account = account.into();
        let inner = Arc::new(Inner {
            hub: EventHub::new(),
            state: RwLock::new(None),
        });

        // Subscribe before the first tick so no observation can be missed.
        let poller = FilePoller::new(
            PollerConfig::new(paths.position_status_file(&instrument, &account))
                .with_period(period)
                .with_autostart(false),
        );
        let parser = Arc::clone(&inner);
        poller.hub().subscribe(FILE_MODIFIED, move |raw: &RawObservation| {
            parser.on_modified(&raw.text);
        });
        poller.start();

        Self {
            instrument,
            account,
            inner,
            poller,
        }
    }

    /// The instrument this watcher tracks.
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// The account this watcher tracks.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Last accepted state, if any observation has been accepted yet.
    pub fn state(&self) -> Option<PositionUpdate> {
        *self.inner.state.read()
    }

    /// Side of the last accepted observation; `None` before any.
    pub fn position(&self) -> Option<MarketPosition> {
        self.inner.state.read().map(|update| update.position)
    }

    /// Last accepted quantity; zero before any observation.
    pub fn quantity(&self) -> Decimal {
        self.inner
            .state
            .read()
            .map(|update| update.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Last accepted average price; zero before any observation.
    pub fn price(&self) -> Decimal {
        self.inner
            .state
            .read()
            .map(|update| update.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// The hub position events are emitted on.
    pub fn hub(&self) -> &EventHub<PositionUpdate> {
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

    /// Await the next position update.
    pub async fn wait_update(&self, timeout: Duration) -> Result<PositionUpdate, CorrelateError> {
        await_event(&self.inner.hub, UPDATE, timeout).await
    }
}
