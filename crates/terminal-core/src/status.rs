//! Status tokens and order attribute enums.

use serde::{Deserialize, Serialize};

/// Connection status reported in a connection status file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    /// Convert from the terminal's string representation.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "CONNECTED" => Some(Self::Connected),
            "DISCONNECTED" => Some(Self::Disconnected),
            _ => None,
        }
    }

    /// Convert to the terminal's string representation.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Connected => "CONNECTED",
            Self::Disconnected => "DISCONNECTED",
        }
    }
}

/// Order lifecycle status reported by the terminal.
///
/// These are informational: the terminal is the transition authority and the
/// watchers report whatever it writes, never validating the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order object created, nothing sent yet.
    Initialized,
    /// Order sent to the broker.
    Submitted,
    /// Order acknowledged by the broker.
    Accepted,
    /// Order live in the market.
    Working,
    /// Change request in flight.
    ChangeSubmitted,
    /// Cancel request in flight.
    CancelPending,
    /// Order cancelled.
    Cancelled,
    /// Order rejected by the broker.
    Rejected,
    /// Order partially filled.
    PartiallyFilled,
    /// Order completely filled.
    Filled,
    /// Stop order waiting for its trigger.
    TriggerPending,
}

impl OrderStatus {
    /// Convert from the terminal's string representation.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "INITIALIZED" => Some(Self::Initialized),
            "SUBMITTED" => Some(Self::Submitted),
            "ACCEPTED" => Some(Self::Accepted),
            "WORKING" => Some(Self::Working),
            "CHANGESUBMITTED" => Some(Self::ChangeSubmitted),
            "CANCELPENDING" => Some(Self::CancelPending),
            "CANCELLED" => Some(Self::Cancelled),
            "REJECTED" => Some(Self::Rejected),
            "PARTIALLYFILLED" => Some(Self::PartiallyFilled),
            "FILLED" => Some(Self::Filled),
            "TRIGGERPENDING" => Some(Self::TriggerPending),
            _ => None,
        }
    }

    /// Convert to the terminal's string representation.
    ///
    /// Doubles as the event name the order watcher emits under.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Initialized => "INITIALIZED",
            Self::Submitted => "SUBMITTED",
            Self::Accepted => "ACCEPTED",
            Self::Working => "WORKING",
            Self::ChangeSubmitted => "CHANGESUBMITTED",
            Self::CancelPending => "CANCELPENDING",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
            Self::PartiallyFilled => "PARTIALLYFILLED",
            Self::Filled => "FILLED",
            Self::TriggerPending => "TRIGGERPENDING",
        }
    }

    /// Check if this is a terminal status (order is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Rejected)
    }

    /// Check if the order is still in flight.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Initialized
                | Self::Submitted
                | Self::Accepted
                | Self::Working
                | Self::ChangeSubmitted
                | Self::CancelPending
                | Self::PartiallyFilled
                | Self::TriggerPending
        )
    }
}

/// Market position side reported in a position status file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPosition {
    Flat,
    Long,
    Short,
}

impl MarketPosition {
    /// Convert from the terminal's string representation.
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "FLAT" => Some(Self::Flat),
            "LONG" => Some(Self::Long),
            "SHORT" => Some(Self::Short),
            _ => None,
        }
    }

    /// Convert to the terminal's string representation.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Flat => "FLAT",
            Self::Long => "LONG",
            Self::Short => "SHORT",
        }
    }

    /// Check if the position is flat (no holdings).
    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }
}

/// Order action (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderAction {
    Buy,
    Sell,
}

impl OrderAction {
    /// Convert to the terminal's string representation.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
}

impl OrderType {
    /// Convert to the terminal's string representation.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::Stop => "STOP",
            Self::StopLimit => "STOPLIMIT",
        }
    }
}

/// Time in force for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Valid for the trading day.
    Day,
    /// Good until cancelled.
    Gtc,
}

impl TimeInForce {
    /// Convert to the terminal's string representation.
    pub fn as_token(&self) -> &'static str {
        match self {
            Self::Day => "DAY",
            Self::Gtc => "GTC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_status_conversion() {
        assert_eq!(
            ConnectionStatus::from_token("CONNECTED"),
            Some(ConnectionStatus::Connected)
        );
        assert_eq!(
            ConnectionStatus::from_token("DISCONNECTED"),
            Some(ConnectionStatus::Disconnected)
        );
        assert_eq!(ConnectionStatus::from_token("connected"), None);
        assert_eq!(ConnectionStatus::from_token(""), None);

        assert_eq!(ConnectionStatus::Connected.as_token(), "CONNECTED");
        assert_eq!(ConnectionStatus::Disconnected.as_token(), "DISCONNECTED");
    }

    #[test]
    fn test_order_status_round_trip() {
        let all = [
            OrderStatus::Initialized,
            OrderStatus::Submitted,
            OrderStatus::Accepted,
            OrderStatus::Working,
            OrderStatus::ChangeSubmitted,
            OrderStatus::CancelPending,
            OrderStatus::Cancelled,
            OrderStatus::Rejected,
            OrderStatus::PartiallyFilled,
            OrderStatus::Filled,
            OrderStatus::TriggerPending,
        ];
        for status in all {
            assert_eq!(OrderStatus::from_token(status.as_token()), Some(status));
        }
        assert_eq!(OrderStatus::from_token("BOGUS"), None);
    }

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());

        assert!(!OrderStatus::Working.is_terminal());
        assert!(!OrderStatus::PartiallyFilled.is_terminal());
        assert!(!OrderStatus::TriggerPending.is_terminal());
    }

    #[test]
    fn test_order_status_active() {
        assert!(OrderStatus::Submitted.is_active());
        assert!(OrderStatus::Working.is_active());
        assert!(OrderStatus::CancelPending.is_active());
        assert!(OrderStatus::TriggerPending.is_active());

        assert!(!OrderStatus::Filled.is_active());
        assert!(!OrderStatus::Rejected.is_active());
    }

    #[test]
    fn test_market_position_conversion() {
        assert_eq!(MarketPosition::from_token("FLAT"), Some(MarketPosition::Flat));
        assert_eq!(MarketPosition::from_token("LONG"), Some(MarketPosition::Long));
        assert_eq!(
            MarketPosition::from_token("SHORT"),
            Some(MarketPosition::Short)
        );
        assert_eq!(MarketPosition::from_token("SIDEWAYS"), None);

        assert!(MarketPosition::Flat.is_flat());
        assert!(!MarketPosition::Long.is_flat());
    }

    #[test]
    fn test_order_attribute_tokens() {
        assert_eq!(OrderAction::Buy.as_token(), "BUY");
        assert_eq!(OrderAction::Sell.as_token(), "SELL");
        assert_eq!(OrderType::Market.as_token(), "MARKET");
        assert_eq!(OrderType::StopLimit.as_token(), "STOPLIMIT");
        assert_eq!(TimeInForce::Day.as_token(), "DAY");
        assert_eq!(TimeInForce::Gtc.as_token(), "GTC");
    }
}
