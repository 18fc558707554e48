//! Most-recent state values held by the specialized watchers.
//!
//! Each watcher keeps exactly one of these, replaced wholesale on every
//! accepted observation and never field-merged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::{MarketPosition, OrderStatus};

/// Connectivity derived from the last accepted connection token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionUpdate {
    /// True iff the last accepted token was `CONNECTED`.
    pub connected: bool,
}

/// Order state as last reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    /// Status that produced this state.
    pub status: OrderStatus,
    /// Signed order quantity.
    pub quantity: Decimal,
    /// Fill or working price.
    pub price: Decimal,
}

/// Position state as last reported by the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    /// Which side of the market the position is on.
    pub position: MarketPosition,
    /// Position size.
    pub quantity: Decimal,
    /// Average entry price.
    pub price: Decimal,
}
