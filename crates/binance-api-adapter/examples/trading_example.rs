/*
[INPUT]:  API credentials from the environment and order parameters
[OUTPUT]: Test-order validation and open order listing
[POS]:    Examples - trading operations
[UPDATE]: When trading API changes
*/

use std::sync::mpsc;

use binance_api_adapter::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Example: Trading operations (requires API key + HMAC signature)
///
/// Reads `BINANCE_API_KEY` / `BINANCE_SECRET_KEY` (a `.env` file works too)
/// and only calls `order/test`, so nothing is ever placed on the book.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Binance Trading Example ===\n");

    let credentials = match ApiCredentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Credentials unavailable: {}", e);
            return;
        }
    };
    let config = TransportConfig::for_environment(BinanceEnvironment::from_env());
    let transport = match Transport::shared(config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to create transport: {}", e);
            return;
        }
    };
    let factory = BinanceApiClientFactory::new(transport, Some(credentials));

    let client = match factory.new_callback_rest_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ Callback client created");

    let order = NewOrder::limit_buy(
        "BNBBTC",
        TimeInForce::Gtc,
        Decimal::new(1, 0),
        Decimal::new(1, 3),
    );
    println!("\nTest order: {:?}", order);

    let (tx, rx) = mpsc::channel();
    let failure_tx = tx.clone();
    client.new_order_test(&order).enqueue(
        move |()| {
            let _ = tx.send(Ok(()));
        },
        move |err| {
            let _ = failure_tx.send(Err(err));
        },
    );

    match rx.recv() {
        Ok(Ok(())) => println!("✓ Order accepted by order/test"),
        Ok(Err(e)) => println!("✗ Error: {}", e),
        Err(_) => println!("✗ Callback never ran"),
    }

    let blocking = match factory.new_rest_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("\nQuerying open orders...");
    match blocking.get_open_orders(&OrderRequest::new("BNBBTC")) {
        Ok(orders) => println!("✓ {} open orders", orders.len()),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Trading example complete");
}
