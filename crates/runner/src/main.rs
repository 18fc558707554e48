use std::time::Duration;

use client::{ClientOptions, NinjaTrader, OrderSpec};
use rust_decimal::Decimal;
use terminal_core::{OrderAction, OrderStatus};
use tracing::{error, info, warn};

/// How long to wait for the terminal connection to confirm.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long to wait for the demo order to reach a terminal status.
const ORDER_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() {
    common::init_logging();

    let mut args = std::env::args().skip(1);
    let connection = args.next().unwrap_or_else(|| "Sim".to_string());
    let instrument = args.next().unwrap_or_else(|| "ES 12-25".to_string());

    let client = match NinjaTrader::new(ClientOptions::default()) {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "failed to construct client");
            return;
        }
    };
    info!(
        account = client.account(),
        root = %client.paths().root().display(),
        "client ready"
    );

    let connection_watcher = client.connection_watcher(&connection);
    info!(connection = %connection, "waiting for terminal connection");
    if let Err(err) = connection_watcher.wait_connected(CONNECT_TIMEOUT).await {
        warn!(%err, "connection not confirmed, submitting anyway");
    }

    // The watcher must exist before the write: the status file may already
    // reflect the terminal's reaction by the time the write returns.
    let order_id = NinjaTrader::generate_order_id("DEMO");
    let order_watcher = client.order_watcher(&order_id);

    let spec = OrderSpec::new(&instrument, OrderAction::Buy, Decimal::ONE)
        .with_order_id(&order_id);
    match client.market(spec).await {
        Ok(path) => info!(path = %path.display(), order_id = %order_id, "order submitted"),
        Err(err) => {
            error!(%err, "failed to submit order");
            return;
        }
    }

    match order_watcher
        .wait_for_status(
            &[
                OrderStatus::Filled,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            ORDER_TIMEOUT,
        )
        .await
    {
        Ok(update) => info!(
            status = update.status.as_token(),
            quantity = %update.quantity,
            price = %update.price,
            "order resolved"
        ),
        Err(err) => error!(%err, "order did not reach a terminal status"),
    }

    client.stop_watchers();
}
