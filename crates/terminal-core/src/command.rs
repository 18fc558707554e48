//! Outbound command model and wire serialization.
//!
//! Every command the terminal accepts is one line of thirteen ordered,
//! semicolon-delimited fields:
//!
//! ```text
//! command;account;instrument;action;quantity;orderType;limitPrice;stopPrice;tif;ocoId;orderId;strategy;strategyId
//! ```
//!
//! Fields that do not apply to a given command are left empty but still
//! delimited, so every line has exactly twelve separators.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::status::{OrderAction, OrderType, TimeInForce};

/// A fully specified order placement.
///
/// Used by both `PLACE` and `REVERSEPOSITION`, which share the same field
/// set on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrder {
    pub account: String,
    pub instrument: String,
    pub action: OrderAction,
    pub quantity: Decimal,
    pub order_type: OrderType,
    /// Limit price (limit and stop-limit orders).
    pub limit_price: Option<Decimal>,
    /// Stop price (stop and stop-limit orders).
    pub stop_price: Option<Decimal>,
    pub tif: TimeInForce,
    /// One-cancels-other group.
    pub oco_id: Option<String>,
    /// Client order ID; required to watch or amend the order later.
    pub order_id: Option<String>,
    /// ATM strategy template name.
    pub strategy: Option<String>,
    pub strategy_id: Option<String>,
}

/// Amendment of a working order's quantity and prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOrder {
    pub order_id: String,
    pub quantity: Decimal,
    pub limit_price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub strategy_id: Option<String>,
}

/// Cancellation of a working order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub order_id: String,
    pub strategy_id: Option<String>,
}

/// Tagged union over the distinct command shapes the terminal accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Place(PlaceOrder),
    Change(ChangeOrder),
    Cancel(CancelOrder),
    ClosePosition {
        account: String,
        instrument: String,
    },
    CloseStrategy {
        strategy_id: String,
    },
    CancelAllOrders,
    FlattenEverything,
    ReversePosition(PlaceOrder),
}

impl Command {
    /// The command token, always the first wire field.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Place(_) => "PLACE",
            Self::Change(_) => "CHANGE",
            Self::Cancel(_) => "CANCEL",
            Self::ClosePosition { .. } => "CLOSEPOSITION",
            Self::CloseStrategy { .. } => "CLOSESTRATEGY",
            Self::CancelAllOrders => "CANCELALLORDERS",
            Self::FlattenEverything => "FLATTENEVERYTHING",
            Self::ReversePosition(_) => "REVERSEPOSITION",
        }
    }

    /// Serialize to one wire line of thirteen delimited fields.
    pub fn to_line(&self) -> String {
        let mut fields = WireFields::new(self.token());

        match self {
            Self::Place(order) | Self::ReversePosition(order) => {
                fields.account = Some(order.account.clone());
                fields.instrument = Some(order.instrument.clone());
                fields.action = Some(order.action.as_token().to_string());
                fields.quantity = Some(order.quantity.to_string());
                fields.order_type = Some(order.order_type.as_token().to_string());
                fields.limit_price = order.limit_price.map(|p| p.to_string());
                fields.stop_price = order.stop_price.map(|p| p.to_string());
                fields.tif = Some(order.tif.as_token().to_string());
                fields.oco_id = order.oco_id.clone();
                fields.order_id = order.order_id.clone();
                fields.strategy = order.strategy.clone();
                fields.strategy_id = order.strategy_id.clone();
            }
            Self::Change(order) => {
                fields.quantity = Some(order.quantity.to_string());
                fields.limit_price = order.limit_price.map(|p| p.to_string());
                fields.stop_price = order.stop_price.map(|p| p.to_string());
                fields.order_id = Some(order.order_id.clone());
                fields.strategy_id = order.strategy_id.clone();
            }
            Self::Cancel(order) => {
                fields.order_id = Some(order.order_id.clone());
                fields.strategy_id = order.strategy_id.clone();
            }
            Self::ClosePosition {
                account,
                instrument,
            } => {
                fields.account = Some(account.clone());
                fields.instrument = Some(instrument.clone());
            }
            Self::CloseStrategy { strategy_id } => {
                fields.strategy_id = Some(strategy_id.clone());
            }
            Self::CancelAllOrders | Self::FlattenEverything => {}
        }

        fields.join()
    }
}

/// Serialize a batch of commands into one command-file body, one line each.
pub fn to_wire_lines(commands: &[Command]) -> String {
    commands
        .iter()
        .map(Command::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The thirteen ordered wire fields; `None` renders as an empty segment.
struct WireFields {
    command: &'static str,
    account: Option<String>,
    instrument: Option<String>,
    action: Option<String>,
    quantity: Option<String>,
    order_type: Option<String>,
    limit_price: Option<String>,
    stop_price: Option<String>,
    tif: Option<String>,
    oco_id: Option<String>,
    order_id: Option<String>,
    strategy: Option<String>,
    strategy_id: Option<String>,
}

impl WireFields {
    fn new(command: &'static str) -> Self {
        Self {
            command,
            account: None,
            instrument: None,
            action: None,
            quantity: None,
            order_type: None,
            limit_price: None,
            stop_price: None,
            tif: None,
            oco_id: None,
            order_id: None,
            strategy: None,
            strategy_id: None,
        }
    }

    fn join(self) -> String {
        [
            self.command.to_string(),
            self.account.unwrap_or_default(),
            self.instrument.unwrap_or_default(),
            self.action.unwrap_or_default(),
            self.quantity.unwrap_or_default(),
            self.order_type.unwrap_or_default(),
            self.limit_price.unwrap_or_default(),
            self.stop_price.unwrap_or_default(),
            self.tif.unwrap_or_default(),
            self.oco_id.unwrap_or_default(),
            self.order_id.unwrap_or_default(),
            self.strategy.unwrap_or_default(),
            self.strategy_id.unwrap_or_default(),
        ]
        .join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn place(order_type: OrderType) -> PlaceOrder {
        PlaceOrder {
            account: "Sim101".into(),
            instrument: "ES 12-25".into(),
            action: OrderAction::Buy,
            quantity: dec!(2),
            order_type,
            limit_price: None,
            stop_price: None,
            tif: TimeInForce::Gtc,
            oco_id: None,
            order_id: None,
            strategy: None,
            strategy_id: None,
        }
    }

    #[test]
    fn test_market_place_line() {
        let command = Command::Place(place(OrderType::Market));
        assert_eq!(
            command.to_line(),
            "PLACE;Sim101;ES 12-25;BUY;2;MARKET;;;GTC;;;;"
        );
    }

    #[test]
    fn test_limit_place_line_keeps_all_fields() {
        let mut order = place(OrderType::Limit);
        order.limit_price = Some(dec!(4500.25));
        order.oco_id = Some("oco-1".into());
        order.order_id = Some("ord-1".into());
        order.strategy = Some("Atm1".into());
        order.strategy_id = Some("str-1".into());

        let command = Command::Place(order);
        assert_eq!(
            command.to_line(),
            "PLACE;Sim101;ES 12-25;BUY;2;LIMIT;4500.25;;GTC;oco-1;ord-1;Atm1;str-1"
        );
    }

    #[test]
    fn test_stop_limit_place_line() {
        let mut order = place(OrderType::StopLimit);
        order.limit_price = Some(dec!(4501));
        order.stop_price = Some(dec!(4500));

        assert_eq!(
            Command::Place(order).to_line(),
            "PLACE;Sim101;ES 12-25;BUY;2;STOPLIMIT;4501;4500;GTC;;;;"
        );
    }

    #[test]
    fn test_change_line() {
        let command = Command::Change(ChangeOrder {
            order_id: "ord-1".into(),
            quantity: dec!(3),
            limit_price: Some(dec!(101.5)),
            stop_price: None,
            strategy_id: None,
        });
        assert_eq!(command.to_line(), "CHANGE;;;;3;;101.5;;;;ord-1;;");
    }

    #[test]
    fn test_cancel_line() {
        let command = Command::Cancel(CancelOrder {
            order_id: "ord-1".into(),
            strategy_id: None,
        });
        assert_eq!(command.to_line(), "CANCEL;;;;;;;;;;ord-1;;");
    }

    #[test]
    fn test_close_position_line() {
        let command = Command::ClosePosition {
            account: "Sim101".into(),
            instrument: "NQ 12-25".into(),
        };
        assert_eq!(command.to_line(), "CLOSEPOSITION;Sim101;NQ 12-25;;;;;;;;;;");
    }

    #[test]
    fn test_close_strategy_line() {
        let command = Command::CloseStrategy {
            strategy_id: "str-1".into(),
        };
        assert_eq!(command.to_line(), "CLOSESTRATEGY;;;;;;;;;;;;str-1");
    }

    #[test]
    fn test_bare_commands() {
        assert_eq!(
            Command::CancelAllOrders.to_line(),
            "CANCELALLORDERS;;;;;;;;;;;;"
        );
        assert_eq!(
            Command::FlattenEverything.to_line(),
            "FLATTENEVERYTHING;;;;;;;;;;;;"
        );
    }

    #[test]
    fn test_reverse_uses_place_fields() {
        let line = Command::ReversePosition(place(OrderType::Market)).to_line();
        assert!(line.starts_with("REVERSEPOSITION;Sim101;ES 12-25;BUY;2;MARKET;"));
    }

    #[test]
    fn test_every_line_has_thirteen_fields() {
        let commands = [
            Command::Place(place(OrderType::Market)),
            Command::Change(ChangeOrder {
                order_id: "o".into(),
                quantity: dec!(1),
                limit_price: None,
                stop_price: None,
                strategy_id: None,
            }),
            Command::Cancel(CancelOrder {
                order_id: "o".into(),
                strategy_id: None,
            }),
            Command::ClosePosition {
                account: "a".into(),
                instrument: "i".into(),
            },
            Command::CloseStrategy {
                strategy_id: "s".into(),
            },
            Command::CancelAllOrders,
            Command::FlattenEverything,
            Command::ReversePosition(place(OrderType::Market)),
        ];
        for command in &commands {
            assert_eq!(command.to_line().split(';').count(), 13, "{command:?}");
        }
    }

    #[test]
    fn test_batch_joins_with_newlines() {
        let batch = [Command::CancelAllOrders, Command::FlattenEverything];
        assert_eq!(
            to_wire_lines(&batch),
            "CANCELALLORDERS;;;;;;;;;;;;\nFLATTENEVERYTHING;;;;;;;;;;;;"
        );
    }
}
