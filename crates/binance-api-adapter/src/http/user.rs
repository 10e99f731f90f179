/*
[INPUT]:  Account queries, wallet requests and listen keys
[OUTPUT]: Account, trade history, wallet data and user data stream keys
[POS]:    HTTP layer - user data endpoints (API key or signature required)
[UPDATE]: When adding new user endpoints or changing query parameters
*/

// ### User Endpoints

use rust_decimal::Decimal;
use serde::de::IgnoredAny;

use crate::http::client::{RestClient, with_signing_window};
use crate::http::endpoints;
use crate::http::executor::ExecutionMode;
use crate::http::request::Params;
use crate::http::{BinanceApiError, Result};
use crate::types::{
    Account, DepositAddress, DepositHistory, ListenKey, Trade, TradeFee, WithdrawHistory,
    WithdrawResult,
};

fn withdraw_params(
    asset: &str,
    address: &str,
    amount: Decimal,
    name: Option<&str>,
    address_tag: Option<&str>,
) -> Result<Params> {
    if asset.trim().is_empty() || address.trim().is_empty() {
        return Err(BinanceApiError::InvalidRequest(
            "withdraw needs an asset and an address".to_string(),
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(BinanceApiError::InvalidRequest(
            "withdraw amount must be positive".to_string(),
        ));
    }
    let params = Params::new()
        .with("asset", asset)
        .with("address", address)
        .with("amount", amount)
        .with_opt("name", name)
        .with_opt("addressTag", address_tag);
    Ok(with_signing_window(params, None, None))
}

fn listen_key_params(listen_key: &str) -> Result<Params> {
    if listen_key.is_empty() {
        return Err(BinanceApiError::InvalidRequest("listen key must not be empty".to_string()));
    }
    Ok(Params::new().with("listenKey", listen_key))
}

impl<M: ExecutionMode> RestClient<M> {
    // ### Account

    /// Balances and permissions, with the default receiving window.
    ///
    /// GET /api/v3/account
    pub fn get_account(&self) -> M::Output<Account> {
        self.get_account_with(None, None)
    }

    pub fn get_account_with(&self, recv_window: Option<u64>, timestamp: Option<i64>) -> M::Output<Account> {
        self.send::<Account>(
            &endpoints::ACCOUNT,
            with_signing_window(Params::new(), recv_window, timestamp),
        )
    }

    /// Fills on the caller's account for `symbol`.
    ///
    /// GET /api/v3/myTrades
    pub fn get_my_trades(&self, symbol: &str, limit: Option<u16>, from_id: Option<i64>) -> M::Output<Vec<Trade>> {
        self.get_my_trades_with(symbol, limit, from_id, None, None)
    }

    pub fn get_my_trades_with(
        &self,
        symbol: &str,
        limit: Option<u16>,
        from_id: Option<i64>,
        recv_window: Option<u64>,
        timestamp: Option<i64>,
    ) -> M::Output<Vec<Trade>> {
        let params = Params::new()
            .with("symbol", symbol)
            .with_opt("limit", limit)
            .with_opt("fromId", from_id);
        self.send::<Vec<Trade>>(
            &endpoints::MY_TRADES,
            with_signing_window(params, recv_window, timestamp),
        )
    }

    /// Maker/taker fee rates per symbol.
    ///
    /// GET /wapi/v3/tradeFee.html
    pub fn get_trade_fee(&self) -> M::Output<TradeFee> {
        self.send::<TradeFee>(&endpoints::TRADE_FEE, with_signing_window(Params::new(), None, None))
    }

    // ### Wallet

    /// Submit a withdrawal.
    ///
    /// POST /wapi/v3/withdraw.html
    pub fn withdraw(
        &self,
        asset: &str,
        address: &str,
        amount: Decimal,
        name: Option<&str>,
        address_tag: Option<&str>,
    ) -> M::Output<WithdrawResult> {
        let call = withdraw_params(asset, address, amount, name, address_tag)
            .and_then(|params| self.call::<WithdrawResult>(&endpoints::WITHDRAW, params));
        self.dispatch(call)
    }

    /// GET /wapi/v3/depositHistory.html
    pub fn get_deposit_history(&self, asset: &str) -> M::Output<DepositHistory> {
        let params = with_signing_window(Params::new().with("asset", asset), None, None);
        self.send::<DepositHistory>(&endpoints::DEPOSIT_HISTORY, params)
    }

    /// GET /wapi/v3/withdrawHistory.html
    pub fn get_withdraw_history(&self, asset: &str) -> M::Output<WithdrawHistory> {
        let params = with_signing_window(Params::new().with("asset", asset), None, None);
        self.send::<WithdrawHistory>(&endpoints::WITHDRAW_HISTORY, params)
    }

    /// GET /wapi/v3/depositAddress.html
    pub fn get_deposit_address(&self, asset: &str) -> M::Output<DepositAddress> {
        let params = with_signing_window(Params::new().with("asset", asset), None, None);
        self.send::<DepositAddress>(&endpoints::DEPOSIT_ADDRESS, params)
    }

    // ### User data stream

    /// Open a user data stream and return its listen key.
    ///
    /// POST /api/v3/userDataStream
    pub fn start_user_data_stream(&self) -> M::Output<String> {
        let call = self
            .call::<ListenKey>(&endpoints::START_USER_DATA_STREAM, Params::new())
            .map(|call| call.map(|key| key.listen_key));
        self.dispatch(call)
    }

    /// Extend a listen key's validity. Streams close after 60 minutes without one.
    ///
    /// PUT /api/v3/userDataStream
    pub fn keep_alive_user_data_stream(&self, listen_key: &str) -> M::Output<()> {
        let call = listen_key_params(listen_key)
            .and_then(|params| self.call::<IgnoredAny>(&endpoints::KEEP_ALIVE_USER_DATA_STREAM, params))
            .map(|call| call.map(|_| ()));
        self.dispatch(call)
    }

    /// DELETE /api/v3/userDataStream
    pub fn close_user_data_stream(&self, listen_key: &str) -> M::Output<()> {
        let call = listen_key_params(listen_key)
            .and_then(|params| self.call::<IgnoredAny>(&endpoints::CLOSE_USER_DATA_STREAM, params))
            .map(|call| call.map(|_| ()));
        self.dispatch(call)
    }
}
