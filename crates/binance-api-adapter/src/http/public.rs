/*
[INPUT]:  Symbol identifiers and query parameters
[OUTPUT]: General exchange info and market data (depth, trades, klines, tickers)
[POS]:    HTTP layer - public endpoints (no signature required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use crate::http::client::RestClient;
use crate::http::endpoints;
use crate::http::executor::ExecutionMode;
use crate::http::request::Params;
use crate::types::{
    AggTrade, Asset, BookTicker, Candlestick, CandlestickInterval, ExchangeInfo, OrderBook,
    ServerTime, TickerPrice, TickerStatistics, TradeHistoryItem,
};

impl<M: ExecutionMode> RestClient<M> {
    // ### General

    /// Test connectivity.
    ///
    /// GET /api/v3/ping
    pub fn ping(&self) -> M::Output<()> {
        self.send_empty(&endpoints::PING, Params::new())
    }

    /// Current server time in milliseconds.
    ///
    /// GET /api/v3/time
    pub fn get_server_time(&self) -> M::Output<i64> {
        let call = self.call::<ServerTime>(&endpoints::SERVER_TIME, Params::new());
        self.dispatch(call.map(|call| call.map(|time| time.server_time)))
    }

    /// Trading rules, rate limits and symbol list.
    ///
    /// GET /api/v3/exchangeInfo
    pub fn get_exchange_info(&self) -> M::Output<ExchangeInfo> {
        self.send::<ExchangeInfo>(&endpoints::EXCHANGE_INFO, Params::new())
    }

    /// Every asset the exchange lists, served by the asset-info host.
    ///
    /// GET /assetWithdraw/getAllAsset.html
    pub fn get_all_assets(&self) -> M::Output<Vec<Asset>> {
        self.send::<Vec<Asset>>(&endpoints::ALL_ASSETS, Params::new())
    }

    // ### Market data

    /// GET /api/v3/depth?symbol={symbol}&limit={limit}
    pub fn get_order_book(&self, symbol: &str, limit: Option<u16>) -> M::Output<OrderBook> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.send::<OrderBook>(&endpoints::ORDER_BOOK, params)
    }

    /// Recent trades.
    ///
    /// GET /api/v3/trades?symbol={symbol}&limit={limit}
    pub fn get_trades(&self, symbol: &str, limit: Option<u16>) -> M::Output<Vec<TradeHistoryItem>> {
        let params = Params::new().with("symbol", symbol).with_opt("limit", limit);
        self.send::<Vec<TradeHistoryItem>>(&endpoints::TRADES, params)
    }

    /// Older trades. Needs an API key but no signature.
    ///
    /// GET /api/v3/historicalTrades?symbol={symbol}&limit={limit}&fromId={from_id}
    pub fn get_historical_trades(
        &self,
        symbol: &str,
        limit: Option<u16>,
        from_id: Option<i64>,
    ) -> M::Output<Vec<TradeHistoryItem>> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("fromId", from_id);
        self.send::<Vec<TradeHistoryItem>>(&endpoints::HISTORICAL_TRADES, params)
    }

    /// GET /api/v3/aggTrades
    pub fn get_agg_trades(
        &self,
        symbol: &str,
        from_id: Option<&str>,
        limit: Option<u16>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> M::Output<Vec<AggTrade>> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("fromId", from_id)
            .with_opt("limit", limit)
            .with_opt("startTime", start_time)
            .with_opt("endTime", end_time);
        self.send::<Vec<AggTrade>>(&endpoints::AGG_TRADES, params)
    }

    /// Most recent aggregate trades for `symbol`.
    pub fn get_recent_agg_trades(&self, symbol: &str) -> M::Output<Vec<AggTrade>> {
        self.get_agg_trades(symbol, None, None, None, None)
    }

    /// GET /api/v3/klines
    pub fn get_candlestick_bars(
        &self,
        symbol: &str,
        interval: CandlestickInterval,
        limit: Option<u16>,
        start_time: Option<i64>,
        end_time: Option<i64>,
    ) -> M::Output<Vec<Candlestick>> {
        let params = Params::new()
            .with("symbol", symbol)
            .with("interval", interval)
            .with_opt("limit", limit)
            .with_opt("startTime", start_time)
            .with_opt("endTime", end_time);
        self.send::<Vec<Candlestick>>(&endpoints::CANDLESTICKS, params)
    }

    /// GET /api/v3/ticker/24hr?symbol={symbol}
    pub fn get_24hr_price_statistics(&self, symbol: &str) -> M::Output<TickerStatistics> {
        self.send::<TickerStatistics>(&endpoints::TICKER_24HR, Params::new().with("symbol", symbol))
    }

    /// GET /api/v3/ticker/24hr
    pub fn get_all_24hr_price_statistics(&self) -> M::Output<Vec<TickerStatistics>> {
        self.send::<Vec<TickerStatistics>>(&endpoints::TICKER_24HR, Params::new())
    }

    /// GET /api/v3/ticker/price?symbol={symbol}
    pub fn get_price(&self, symbol: &str) -> M::Output<TickerPrice> {
        self.send::<TickerPrice>(&endpoints::TICKER_PRICE, Params::new().with("symbol", symbol))
    }

    /// GET /api/v3/ticker/price
    pub fn get_all_prices(&self) -> M::Output<Vec<TickerPrice>> {
        self.send::<Vec<TickerPrice>>(&endpoints::TICKER_PRICE, Params::new())
    }

    /// Best bid/ask for every symbol.
    ///
    /// GET /api/v3/ticker/bookTicker
    pub fn get_book_tickers(&self) -> M::Output<Vec<BookTicker>> {
        self.send::<Vec<BookTicker>>(&endpoints::BOOK_TICKERS, Params::new())
    }
}
