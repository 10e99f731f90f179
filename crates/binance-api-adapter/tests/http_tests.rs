/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for the REST client in every execution mode
[POS]:    Integration tests - HTTP endpoints and failure surfaces
[UPDATE]: When HTTP endpoints or error mapping change
*/

mod common;

use std::sync::Arc;
use std::time::Duration;

use binance_api_adapter::{
    BinanceApiError, BookTicker, NewOrder, OrderBook, TickerPrice, TimeInForce, TransportConfig,
};
use common::{
    public_factory, setup_mock_server, signed_factory, transport_for, transport_with,
    unknown_order_body,
};
use reqwest::StatusCode;
use rust_decimal_macros::dec;
use tokio::sync::mpsc;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INVALID_SYMBOL: &str = r#"{"code": -1121, "msg": "Invalid symbol."}"#;

async fn mount_invalid_symbol(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "NOPE"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(INVALID_SYMBOL, "application/json"))
        .mount(server)
        .await;
}

fn assert_invalid_symbol(err: &BinanceApiError) {
    assert!(err.is_api_error(), "unexpected error: {err:?}");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    let api_error = err.api_error().expect("api error");
    assert_eq!(api_error.code, -1121);
    assert_eq!(api_error.msg, "Invalid symbol.");
}

#[test]
fn test_factory_creation() {
    let transport = transport_for("http://127.0.0.1:9");
    let client = assert_ok!(public_factory(Arc::clone(&transport)).new_rest_client());
    assert!(!client.is_authenticated());
    assert!(Arc::ptr_eq(client.transport(), &transport));
}

#[tokio::test]
async fn test_async_round_trip() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/bookTicker"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"symbol":"LTCBTC","bidPrice":"4.00000000","bidQty":"431.00000000","askPrice":"4.00000200","askQty":"9.00000000"}]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let tickers = client.get_book_tickers().await.expect("book tickers");

    assert_eq!(
        tickers,
        vec![BookTicker {
            symbol: "LTCBTC".into(),
            bid_price: dec!(4.00000000),
            bid_qty: dec!(431.00000000),
            ask_price: dec!(4.00000200),
            ask_qty: dec!(9.00000000),
        }]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_blocking_round_trip() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .and(query_param("symbol", "BNBBTC"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"lastUpdateId": 7, "bids": [], "asks": []}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_rest_client()
        .expect("client");
    let book = tokio::task::spawn_blocking(move || client.get_order_book("BNBBTC", None))
        .await
        .expect("join")
        .expect("order book");

    assert_eq!(
        book,
        OrderBook {
            last_update_id: 7,
            bids: vec![],
            asks: vec![],
        }
    );
}

#[tokio::test]
async fn test_blocking_client_inside_runtime() {
    let server = setup_mock_server().await;
    mount_invalid_symbol(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ping"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_rest_client()
        .expect("client");

    assert_ok!(client.ping());
    assert_invalid_symbol(&client.get_price("NOPE").unwrap_err());
}

#[tokio::test]
async fn test_callback_round_trip() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "ETHBTC"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"symbol":"ETHBTC","price":"0.07946600"}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_callback_rest_client()
        .expect("client");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let failure_tx = tx.clone();

    client.get_price("ETHBTC").enqueue(
        move |price| {
            let _ = tx.send(Ok(price));
        },
        move |err| {
            let _ = failure_tx.send(Err(err));
        },
    );

    let price: TickerPrice = rx.recv().await.expect("callback ran").expect("price");
    assert_eq!(price.price, dec!(0.07946600));
}

#[tokio::test]
async fn test_api_error_async() {
    let server = setup_mock_server().await;
    mount_invalid_symbol(&server).await;

    let client = public_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let err = client.get_price("NOPE").await.unwrap_err();

    assert_invalid_symbol(&err);
    assert!(!err.is_retryable());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_blocking() {
    let server = setup_mock_server().await;
    mount_invalid_symbol(&server).await;

    let client = public_factory(transport_for(&server.uri()))
        .new_rest_client()
        .expect("client");
    let err = tokio::task::spawn_blocking(move || client.get_price("NOPE"))
        .await
        .expect("join")
        .unwrap_err();

    assert_invalid_symbol(&err);
}

#[tokio::test]
async fn test_api_error_callback_runs_failure_once() {
    let server = setup_mock_server().await;
    mount_invalid_symbol(&server).await;

    let client = public_factory(transport_for(&server.uri()))
        .new_callback_rest_client()
        .expect("client");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let failure_tx = tx.clone();

    client.get_price("NOPE").enqueue(
        move |price| {
            let _ = tx.send(Ok(price));
        },
        move |err| {
            let _ = failure_tx.send(Err(err));
        },
    );

    let err = rx.recv().await.expect("callback ran").unwrap_err();
    assert_invalid_symbol(&err);

    // Both senders are gone once the single callback has run.
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_callback_assembly_error_runs_on_caller_thread() {
    let client = signed_factory(transport_for("http://127.0.0.1:9"))
        .new_callback_rest_client()
        .expect("client");
    let caller = std::thread::current().id();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut order = NewOrder::limit_buy("BTCUSDT", TimeInForce::Gtc, dec!(1), dec!(100));
    order.price = None;
    client.new_order(&order).enqueue(
        |_| panic!("order must not succeed"),
        move |err| {
            let _ = tx.send((std::thread::current().id(), err));
        },
    );

    let (thread, err) = rx.recv().await.expect("failure callback");
    assert_eq!(thread, caller);
    assert!(matches!(err, BinanceApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_transport_failure_without_response() {
    let config = TransportConfig {
        connect_timeout: Duration::from_secs(2),
        ..TransportConfig::default().with_base_url("http://127.0.0.1:1")
    };
    let client = public_factory(transport_with(config))
        .new_async_rest_client()
        .expect("client");

    let err = client.ping().await.unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert_eq!(err.status(), None);
    assert!(err.api_error().is_none());
}

#[tokio::test]
async fn test_undecodable_error_body_keeps_status() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let err = client.get_exchange_info().await.unwrap_err();

    match &err {
        BinanceApiError::Http { status, message } => {
            assert_eq!(*status, StatusCode::BAD_GATEWAY);
            assert!(message.contains("Bad Gateway"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_unknown_order_error_on_signed_call() {
    let server = setup_mock_server().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/order"))
        .respond_with(
            ResponseTemplate::new(400).set_body_raw(unknown_order_body(), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let err = client
        .cancel_order(&binance_api_adapter::CancelOrderRequest::by_order_id("LTCBTC", 99))
        .await
        .unwrap_err();

    assert_eq!(err.api_error().map(|e| e.code), Some(-2013));
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"symbol": 1}"#, "application/json"))
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let err = client.get_price("ETHBTC").await.unwrap_err();

    match err {
        BinanceApiError::Decode { body, .. } => assert_eq!(body, r#"{"symbol": 1}"#),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_asset_info_uses_its_own_host() {
    let api = setup_mock_server().await;
    let assets = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/assetWithdraw/getAllAsset.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id":"1","assetCode":"BTC","assetName":"Bitcoin","unit":"฿","transactionFee":0.0005,"commissionRate":0,"freeAuditWithdrawAmt":1000,"freeUserChargeAmount":10000000,"minProductWithdraw":"0.001","withdrawIntegerMultiple":"0.00000001","confirmTimes":"1","enableWithdraw":true,"isLegalMoney":false}]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&assets)
        .await;

    let config = TransportConfig {
        api_base_url: Some(api.uri()),
        asset_base_url: Some(assets.uri()),
        ..TransportConfig::default()
    };
    let client = public_factory(transport_with(config))
        .new_async_rest_client()
        .expect("client");

    let listed = client.get_all_assets().await.expect("assets");

    assert_eq!(listed.len(), 1);
    assert!(api.received_requests().await.unwrap_or_default().is_empty());
}
