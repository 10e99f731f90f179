/*
[INPUT]:  Exchange REST endpoint documentation
[OUTPUT]: Static operation table
[POS]:    HTTP layer - endpoint enumeration
[UPDATE]: When endpoints, parameters, or security levels change
*/

use super::operation::{BaseUrl, Operation, ParamEncoding, Security};

// ### General

pub static PING: Operation = Operation::get("ping", "/api/v3/ping");

pub static SERVER_TIME: Operation = Operation::get("server_time", "/api/v3/time");

pub static EXCHANGE_INFO: Operation = Operation::get("exchange_info", "/api/v3/exchangeInfo");

pub static ALL_ASSETS: Operation =
    Operation::get("all_assets", "/assetWithdraw/getAllAsset.html").base(BaseUrl::AssetInfo);

// ### Market data

pub static ORDER_BOOK: Operation =
    Operation::get("order_book", "/api/v3/depth").params(&["symbol", "limit"]);

pub static TRADES: Operation =
    Operation::get("trades", "/api/v3/trades").params(&["symbol", "limit"]);

pub static HISTORICAL_TRADES: Operation = Operation::get("historical_trades", "/api/v3/historicalTrades")
    .params(&["symbol", "limit", "fromId"])
    .security(Security::ApiKey);

pub static AGG_TRADES: Operation = Operation::get("agg_trades", "/api/v3/aggTrades")
    .params(&["symbol", "fromId", "limit", "startTime", "endTime"]);

pub static CANDLESTICKS: Operation = Operation::get("candlesticks", "/api/v3/klines")
    .params(&["symbol", "interval", "limit", "startTime", "endTime"]);

pub static TICKER_24HR: Operation =
    Operation::get("ticker_24hr", "/api/v3/ticker/24hr").params(&["symbol"]);

pub static TICKER_PRICE: Operation =
    Operation::get("ticker_price", "/api/v3/ticker/price").params(&["symbol"]);

pub static BOOK_TICKERS: Operation = Operation::get("book_tickers", "/api/v3/ticker/bookTicker");

// ### Trading

const NEW_ORDER_PARAMS: &[&str] = &[
    "symbol",
    "side",
    "type",
    "timeInForce",
    "quantity",
    "quoteOrderQty",
    "price",
    "newClientOrderId",
    "stopPrice",
    "icebergQty",
    "newOrderRespType",
    "recvWindow",
    "timestamp",
];

pub static NEW_ORDER: Operation = Operation::post("new_order", "/api/v3/order")
    .params(NEW_ORDER_PARAMS)
    .security(Security::Signed)
    .encoding(ParamEncoding::Form);

pub static NEW_ORDER_TEST: Operation = Operation::post("new_order_test", "/api/v3/order/test")
    .params(NEW_ORDER_PARAMS)
    .security(Security::Signed)
    .encoding(ParamEncoding::Form);

pub static ORDER_STATUS: Operation = Operation::get("order_status", "/api/v3/order")
    .params(&["symbol", "orderId", "origClientOrderId", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static CANCEL_ORDER: Operation = Operation::delete("cancel_order", "/api/v3/order")
    .params(&[
        "symbol",
        "orderId",
        "origClientOrderId",
        "newClientOrderId",
        "recvWindow",
        "timestamp",
    ])
    .security(Security::Signed);

pub static OPEN_ORDERS: Operation = Operation::get("open_orders", "/api/v3/openOrders")
    .params(&["symbol", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static ALL_ORDERS: Operation = Operation::get("all_orders", "/api/v3/allOrders")
    .params(&["symbol", "orderId", "limit", "recvWindow", "timestamp"])
    .security(Security::Signed);

// ### Account

pub static ACCOUNT: Operation = Operation::get("account", "/api/v3/account")
    .params(&["recvWindow", "timestamp"])
    .security(Security::Signed);

pub static MY_TRADES: Operation = Operation::get("my_trades", "/api/v3/myTrades")
    .params(&["symbol", "limit", "fromId", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static WITHDRAW: Operation = Operation::post("withdraw", "/wapi/v3/withdraw.html")
    .params(&["asset", "address", "amount", "name", "addressTag", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static DEPOSIT_HISTORY: Operation = Operation::get("deposit_history", "/wapi/v3/depositHistory.html")
    .params(&["asset", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static WITHDRAW_HISTORY: Operation = Operation::get("withdraw_history", "/wapi/v3/withdrawHistory.html")
    .params(&["asset", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static DEPOSIT_ADDRESS: Operation = Operation::get("deposit_address", "/wapi/v3/depositAddress.html")
    .params(&["asset", "recvWindow", "timestamp"])
    .security(Security::Signed);

pub static TRADE_FEE: Operation = Operation::get("trade_fee", "/wapi/v3/tradeFee.html")
    .params(&["recvWindow", "timestamp"])
    .security(Security::Signed);

// ### User data stream

pub static START_USER_DATA_STREAM: Operation =
    Operation::post("start_user_data_stream", "/api/v3/userDataStream").security(Security::ApiKey);

pub static KEEP_ALIVE_USER_DATA_STREAM: Operation =
    Operation::put("keep_alive_user_data_stream", "/api/v3/userDataStream")
        .params(&["listenKey"])
        .security(Security::ApiKey);

pub static CLOSE_USER_DATA_STREAM: Operation =
    Operation::delete("close_user_data_stream", "/api/v3/userDataStream")
        .params(&["listenKey"])
        .security(Security::ApiKey);

/// Every operation the REST client binds.
pub static REST_OPERATIONS: &[&Operation] = &[
    &PING,
    &SERVER_TIME,
    &EXCHANGE_INFO,
    &ALL_ASSETS,
    &ORDER_BOOK,
    &TRADES,
    &HISTORICAL_TRADES,
    &AGG_TRADES,
    &CANDLESTICKS,
    &TICKER_24HR,
    &TICKER_PRICE,
    &BOOK_TICKERS,
    &NEW_ORDER,
    &NEW_ORDER_TEST,
    &ORDER_STATUS,
    &CANCEL_ORDER,
    &OPEN_ORDERS,
    &ALL_ORDERS,
    &ACCOUNT,
    &MY_TRADES,
    &WITHDRAW,
    &DEPOSIT_HISTORY,
    &WITHDRAW_HISTORY,
    &DEPOSIT_ADDRESS,
    &TRADE_FEE,
    &START_USER_DATA_STREAM,
    &KEEP_ALIVE_USER_DATA_STREAM,
    &CLOSE_USER_DATA_STREAM,
];
