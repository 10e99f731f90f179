/*
[INPUT]:  Symbol identifier (e.g., "BNBBTC")
[OUTPUT]: Market data (server time, depth, klines, prices)
[POS]:    Examples - public market data queries
[UPDATE]: When adding new market data endpoints
*/

use binance_api_adapter::*;
use tracing_subscriber::EnvFilter;

/// Example: Query market data (no authentication required)
///
/// Runs the same queries through a blocking client and an async client
/// that share one transport.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Binance Market Data Example ===\n");

    let config = TransportConfig::for_environment(BinanceEnvironment::from_env());
    let transport = match Transport::shared(config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to create transport: {}", e);
            return;
        }
    };
    let factory = BinanceApiClientFactory::public(transport);

    let client = match factory.new_rest_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return;
        }
    };
    println!("✓ Blocking client created (no auth required for public endpoints)\n");

    let symbol = "BNBBTC";

    match client.get_server_time() {
        Ok(time) => println!("✓ Server time: {}", time),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying depth book for {}...", symbol);
    match client.get_order_book(symbol, Some(5)) {
        Ok(book) => {
            for bid in &book.bids {
                println!("  bid {} x {}", bid.price(), bid.qty());
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\nQuerying hourly candles for {}...", symbol);
    match client.get_candlestick_bars(symbol, CandlestickInterval::Hourly, Some(3), None, None) {
        Ok(bars) => {
            for bar in bars {
                println!("  {} open {} close {}", bar.open_time, bar.open, bar.close);
            }
        }
        Err(e) => println!("✗ Error: {}", e),
    }

    // Async client on a caller-owned runtime; I/O still runs on the transport's workers.
    let async_client = match factory.new_async_rest_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create async client: {}", e);
            return;
        }
    };
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to build runtime: {}", e);
            return;
        }
    };

    println!("\nQuerying price for {} asynchronously...", symbol);
    match runtime.block_on(async_client.get_price(symbol)) {
        Ok(price) => println!("✓ Price: {}", price.price),
        Err(e) => println!("✗ Error: {}", e),
    }

    println!("\n✓ Market data example complete");
}
