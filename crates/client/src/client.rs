//! The terminal client facade.

use std::path::PathBuf;
use std::sync::Arc;

use common::TerminalPaths;
use rand::Rng;
use rust_decimal::Decimal;
use state_watch::{ConnectionWatcher, OrderWatcher, PositionWatcher};
use terminal_core::{
    to_wire_lines, CancelOrder, ChangeOrder, Command, OrderAction, OrderType, PlaceOrder,
    TimeInForce,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::ClientError;
use crate::registry::WatcherRegistry;

/// Account used when none is configured.
pub const DEFAULT_ACCOUNT: &str = "Sim101";

/// Options accepted by [`NinjaTrader::new`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Trading account; defaults to [`DEFAULT_ACCOUNT`].
    pub account: Option<String>,
    /// Terminal root; resolved from the environment when unset.
    pub path: Option<PathBuf>,
}

/// Order fields shared by every placement convenience method.
#[derive(Debug, Clone)]
pub struct OrderSpec {
    pub instrument: String,
    pub action: OrderAction,
    pub quantity: Decimal,
    pub tif: TimeInForce,
    pub oco_id: Option<String>,
    pub order_id: Option<String>,
    pub strategy: Option<String>,
    pub strategy_id: Option<String>,
}

impl OrderSpec {
    /// Spec with day time-in-force and no optional identifiers.
    pub fn new(instrument: impl Into<String>, action: OrderAction, quantity: Decimal) -> Self {
        Self {
            instrument: instrument.into(),
            action,
            quantity,
            tif: TimeInForce::Day,
            oco_id: None,
            order_id: None,
            strategy: None,
            strategy_id: None,
        }
    }

    /// Set the time in force.
    pub fn with_tif(mut self, tif: TimeInForce) -> Self {
        self.tif = tif;
        self
    }

    /// Set the one-cancels-other group.
    pub fn with_oco_id(mut self, oco_id: impl Into<String>) -> Self {
        self.oco_id = Some(oco_id.into());
        self
    }

    /// Set the client order ID; required to watch or amend the order later.
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Set the ATM strategy template name.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }

    /// Set the strategy instance ID.
    pub fn with_strategy_id(mut self, strategy_id: impl Into<String>) -> Self {
        self.strategy_id = Some(strategy_id.into());
        self
    }
}

/// High-level client for the terminal's file interface.
///
/// Construct the relevant watcher before submitting the command it should
/// observe — the status file may already reflect the terminal's reaction by
/// the time the write returns.
pub struct NinjaTrader {
    account: String,
    paths: TerminalPaths,
    watchers: WatcherRegistry,
}

impl std::fmt::Debug for NinjaTrader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NinjaTrader")
            .field("account", &self.account)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl NinjaTrader {
    /// Build a client; fails when no usable root path can be resolved.
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        let paths = match options.path {
            Some(root) => TerminalPaths::new(root),
            None => TerminalPaths::from_env().ok_or(ClientError::MissingRootPath)?,
        };

        Ok(Self {
            account: options
                .account
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
            paths,
            watchers: WatcherRegistry::new(),
        })
    }

    /// The configured account.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The resolved terminal layout.
    pub fn paths(&self) -> &TerminalPaths {
        &self.paths
    }

    /// Generate a unique client order ID with a prefix.
    ///
    /// Format: `{prefix}_{uuid}` where uuid is a v4 UUID in simple format.
    pub fn generate_order_id(prefix: &str) -> String {
        format!("{}_{}", prefix, Uuid::new_v4().as_simple())
    }

    // --- Order placement ---

    /// Submit a market order.
    pub async fn market(&self, spec: OrderSpec) -> Result<PathBuf, ClientError> {
        self.submit(&[self.place(OrderType::Market, None, None, spec)])
            .await
    }

    /// Submit several market orders in one command file.
    pub async fn market_many(&self, specs: Vec<OrderSpec>) -> Result<PathBuf, ClientError> {
        let commands: Vec<Command> = specs
            .into_iter()
            .map(|spec| self.place(OrderType::Market, None, None, spec))
            .collect();
        self.submit(&commands).await
    }

    /// Submit a limit order.
    pub async fn limit(
        &self,
        spec: OrderSpec,
        limit_price: Decimal,
    ) -> Result<PathBuf, ClientError> {
        self.submit(&[self.place(OrderType::Limit, Some(limit_price), None, spec)])
            .await
    }

    /// Submit several limit orders in one command file.
    pub async fn limit_many(
        &self,
        orders: Vec<(OrderSpec, Decimal)>,
    ) -> Result<PathBuf, ClientError> {
        let commands: Vec<Command> = orders
            .into_iter()
            .map(|(spec, limit_price)| self.place(OrderType::Limit, Some(limit_price), None, spec))
            .collect();
        self.submit(&commands).await
    }

    /// Submit a stop order.
    pub async fn stop(
        &self,
        spec: OrderSpec,
        stop_price: Decimal,
    ) -> Result<PathBuf, ClientError> {
        self.submit(&[self.place(OrderType::Stop, None, Some(stop_price), spec)])
            .await
    }

    /// Submit several stop orders in one command file.
    pub async fn stop_many(
        &self,
        orders: Vec<(OrderSpec, Decimal)>,
    ) -> Result<PathBuf, ClientError> {
        let commands: Vec<Command> = orders
            .into_iter()
            .map(|(spec, stop_price)| self.place(OrderType::Stop, None, Some(stop_price), spec))
            .collect();
        self.submit(&commands).await
    }

    /// Submit a stop-limit order.
    pub async fn stop_limit(
        &self,
        spec: OrderSpec,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Result<PathBuf, ClientError> {
        self.submit(&[self.place(
            OrderType::StopLimit,
            Some(limit_price),
            Some(stop_price),
            spec,
        )])
        .await
    }

    /// Submit several stop-limit orders in one command file.
    ///
    /// Each entry is `(spec, stop_price, limit_price)`.
    pub async fn stop_limit_many(
        &self,
        orders: Vec<(OrderSpec, Decimal, Decimal)>,
    ) -> Result<PathBuf, ClientError> {
        let commands: Vec<Command> = orders
            .into_iter()
            .map(|(spec, stop_price, limit_price)| {
                self.place(
                    OrderType::StopLimit,
                    Some(limit_price),
                    Some(stop_price),
                    spec,
                )
            })
            .collect();
        self.submit(&commands).await
    }

    // --- Order and position management ---

    /// Cancel a working order.
    pub async fn cancel(&self, order: CancelOrder) -> Result<PathBuf, ClientError> {
        self.submit(&[Command::Cancel(order)]).await
    }

    /// Amend a working order.
    pub async fn change(&self, order: ChangeOrder) -> Result<PathBuf, ClientError> {
        self.submit(&[Command::Change(order)]).await
    }

    /// Close the position in an instrument on the configured account.
    pub async fn close(&self, instrument: impl Into<String>) -> Result<PathBuf, ClientError> {
        self.submit(&[Command::ClosePosition {
            account: self.account.clone(),
            instrument: instrument.into(),
        }])
        .await
    }

    /// Close an ATM strategy instance.
    pub async fn close_strategy(
        &self,
        strategy_id: impl Into<String>,
    ) -> Result<PathBuf, ClientError> {
        self.submit(&[Command::CloseStrategy {
            strategy_id: strategy_id.into(),
        }])
        .await
    }

    /// Cancel every working order.
    pub async fn cancel_all(&self) -> Result<PathBuf, ClientError> {
        self.submit(&[Command::CancelAllOrders]).await
    }

    /// Flatten everything: cancel all orders and close all positions.
    pub async fn flatten(&self) -> Result<PathBuf, ClientError> {
        self.submit(&[Command::FlattenEverything]).await
    }

    /// Reverse the position in an instrument.
    pub async fn reverse(
        &self,
        spec: OrderSpec,
        order_type: OrderType,
        limit_price: Option<Decimal>,
        stop_price: Option<Decimal>,
    ) -> Result<PathBuf, ClientError> {
        let place = self.place_order(order_type, limit_price, stop_price, spec);
        self.submit(&[Command::ReversePosition(place)]).await
    }

    /// Serialize `commands` and write them as one command file.
    ///
    /// Returns the path written; there is no delivery guarantee once the
    /// terminal picks the file up.
    pub async fn submit(&self, commands: &[Command]) -> Result<PathBuf, ClientError> {
        let path = self.paths.command_file(&command_nonce());
        tokio::fs::write(&path, to_wire_lines(commands)).await?;
        debug!(
            path = %path.display(),
            commands = commands.len(),
            "submitted command file"
        );
        Ok(path)
    }

    // --- Watchers ---

    /// Registry-cached watcher for a connection's status file.
    pub fn connection_watcher(&self, connection: &str) -> Arc<ConnectionWatcher> {
        self.watchers.connection(&self.paths, connection)
    }

    /// Registry-cached watcher for an order on the configured account.
    pub fn order_watcher(&self, order_id: &str) -> Arc<OrderWatcher> {
        self.watchers.order(&self.paths, &self.account, order_id)
    }

    /// Registry-cached watcher for an instrument's position on the
    /// configured account.
    pub fn position_watcher(&self, instrument: &str) -> Arc<PositionWatcher> {
        self.watchers
            .position(&self.paths, instrument, &self.account)
    }

    /// Stop every cached watcher's poller.
    pub fn stop_watchers(&self) {
        self.watchers.stop_all();
    }

    fn place(
        &self,
        order_type: OrderType,
        limit_price: Option<Decimal>,
        stop_price: Option<Decimal>,
        spec: OrderSpec,
    ) -> Command {
        Command::Place(self.place_order(order_type, limit_price, stop_price, spec))
    }

    fn place_order(
        &self,
        order_type: OrderType,
        limit_price: Option<Decimal>,
        stop_price: Option<Decimal>,
        spec: OrderSpec,
    ) -> PlaceOrder {
        PlaceOrder {
            account: self.account.clone(),
            instrument: spec.instrument,
            action: spec.action,
            quantity: spec.quantity,
            order_type,
            limit_price,
            stop_price,
            tif: spec.tif,
            oco_id: spec.oco_id,
            order_id: spec.order_id,
            strategy: spec.strategy,
            strategy_id: spec.strategy_id,
        }
    }
}

fn command_nonce() -> String {
    rand::thread_rng().gen::<u64>().to_string()
}
