//! Core terminal types.
//!
//! This crate provides the fixed vocabulary shared with the trading terminal:
//!
//! - **Status tokens**: `ConnectionStatus`, `OrderStatus`, `MarketPosition`
//! - **Order attributes**: `OrderAction`, `OrderType`, `TimeInForce`
//! - **State values**: `ConnectionUpdate`, `OrderUpdate`, `PositionUpdate`
//!   held by the specialized watchers
//! - **Command model**: the tagged `Command` union and its wire serialization
//!
//! # Wire format
//!
//! Every outbound command is one line of thirteen semicolon-delimited fields;
//! fields that do not apply to a given command are left empty but still
//! delimited. Status files carry either a bare status token (connection) or a
//! `token;quantity;price` triple (orders and positions).

mod command;
mod state;
mod status;

pub use command::{
    to_wire_lines, CancelOrder, ChangeOrder, Command, PlaceOrder,
};
pub use state::{ConnectionUpdate, OrderUpdate, PositionUpdate};
pub use status::{
    ConnectionStatus, MarketPosition, OrderAction, OrderStatus, OrderType, TimeInForce,
};
