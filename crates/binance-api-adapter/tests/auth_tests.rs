/*
[INPUT]:  Mock signed and keyed endpoints
[OUTPUT]: Test results for API key headers and request signatures
[POS]:    Integration tests - authentication
[UPDATE]: When signing or key-header handling changes
*/

mod common;

use binance_api_adapter::{
    ApiCredentials, BinanceApiClientFactory, BinanceApiError, HmacSigner, NewOrder,
    OrderStatusRequest, TimeInForce,
};
use common::{
    TEST_API_KEY, TEST_SECRET_KEY, public_factory, setup_mock_server, signed_factory,
    transport_for,
};
use rust_decimal_macros::dec;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ORDER_BODY: &str = r#"{
    "symbol": "LTCBTC",
    "orderId": 1,
    "clientOrderId": "myOrder1",
    "price": "0.1",
    "origQty": "1.0",
    "executedQty": "0.0",
    "status": "NEW",
    "timeInForce": "GTC",
    "type": "LIMIT",
    "side": "BUY",
    "time": 1499827319559,
    "isWorking": true
}"#;

/// Split `payload` at its signature and check the digest covers everything before it.
fn assert_signed_last(payload: &str) {
    assert_eq!(payload.matches("signature=").count(), 1, "payload: {payload}");
    let (signed, signature) = payload
        .rsplit_once("&signature=")
        .expect("signature appended after the other parameters");
    assert!(!signature.contains('&'));
    assert_eq!(signature.len(), 64);
    assert_eq!(signature, HmacSigner::sign(TEST_SECRET_KEY, signed));
}

async fn single_request(server: &MockServer) -> Request {
    let mut requests = server.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 1);
    requests.remove(0)
}

#[test]
fn test_credentials_debug_is_redacted() {
    let credentials = ApiCredentials::new(TEST_API_KEY, TEST_SECRET_KEY);
    let rendered = format!("{credentials:?}");

    assert!(!rendered.contains(TEST_SECRET_KEY));
    assert_eq!(credentials.api_key(), TEST_API_KEY);
}

#[tokio::test]
async fn test_signed_query_carries_key_and_trailing_signature() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/order"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ORDER_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let request = OrderStatusRequest::by_order_id("LTCBTC", 1)
        .recv_window(5000)
        .timestamp(1499827319559);
    assert_ok!(client.get_order_status(&request).await);

    let received = single_request(&server).await;
    assert_eq!(
        received.headers.get("x-api-key").and_then(|v| v.to_str().ok()),
        Some(TEST_API_KEY)
    );
    let query = received.url.query().expect("query string");
    assert!(query.starts_with("symbol=LTCBTC&orderId=1&recvWindow=5000&timestamp=1499827319559&"));
    assert_signed_last(query);
}

#[tokio::test]
async fn test_signed_form_body_matches_published_vector() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/order/test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let order = NewOrder::limit_buy("LTCBTC", TimeInForce::Gtc, dec!(1), dec!(0.1))
        .recv_window(5000)
        .timestamp(1499827319559);
    assert_ok!(client.new_order_test(&order).await);

    let received = single_request(&server).await;
    let body = String::from_utf8(received.body).expect("utf-8 body");
    assert!(received.url.query().is_none());
    assert_signed_last(&body);
    assert!(body.starts_with(
        "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1"
    ));
}

#[tokio::test]
async fn test_keyed_call_has_key_but_no_signature() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/historicalTrades"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = signed_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let trades = client
        .get_historical_trades("BNBBTC", Some(10), None)
        .await
        .expect("historical trades");

    assert!(trades.is_empty());
    let received = single_request(&server).await;
    assert!(received.headers.contains_key("x-api-key"));
    assert!(!received.url.query().unwrap_or_default().contains("signature="));
}

#[tokio::test]
async fn test_public_call_without_credentials_sends_nothing_secret() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = public_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    assert_ok!(client.ping().await);

    let received = single_request(&server).await;
    assert!(!received.headers.contains_key("x-api-key"));
    assert!(received.url.query().is_none());
}

#[tokio::test]
async fn test_public_client_rejects_signed_call_before_sending() {
    let server = setup_mock_server().await;

    let client = public_factory(transport_for(&server.uri()))
        .new_async_rest_client()
        .expect("client");
    let err = client.get_account().await.unwrap_err();

    assert!(matches!(err, BinanceApiError::InvalidRequest(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_empty_credentials_reject_signed_call_before_sending() {
    let server = setup_mock_server().await;

    let client = BinanceApiClientFactory::with_credentials(transport_for(&server.uri()), "", "")
        .new_async_rest_client()
        .expect("client");
    assert!(!client.is_authenticated());

    let err = client.get_account().await.unwrap_err();

    assert!(matches!(err, BinanceApiError::InvalidRequest(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_empty_secret_sends_public_calls_without_key_header() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = BinanceApiClientFactory::with_credentials(transport_for(&server.uri()), TEST_API_KEY, "")
        .new_async_rest_client()
        .expect("client");
    assert_ok!(client.ping().await);

    let received = single_request(&server).await;
    assert!(!received.headers.contains_key("x-api-key"));
}

#[tokio::test]
async fn test_api_key_header_name_is_configurable() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/userDataStream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"listenKey":"k"}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let config = binance_api_adapter::TransportConfig {
        api_key_header: "X-MBX-APIKEY".to_string(),
        ..binance_api_adapter::TransportConfig::default().with_base_url(server.uri())
    };
    let transport = common::transport_with(config);
    let client = BinanceApiClientFactory::new(
        transport,
        Some(ApiCredentials::new(TEST_API_KEY, TEST_SECRET_KEY)),
    )
    .new_async_rest_client()
    .expect("client");

    assert_eq!(client.start_user_data_stream().await.expect("listen key"), "k");
    let received = single_request(&server).await;
    assert!(received.headers.contains_key("x-mbx-apikey"));
    assert!(!received.headers.contains_key("x-api-key"));
}
