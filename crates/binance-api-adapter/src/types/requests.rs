/*
[INPUT]:  Caller-supplied order and query fields
[OUTPUT]: Typed request objects validated before any network call
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new request fields added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{NewOrderResponseType, OrderSide, OrderType, TimeInForce};
use crate::http::{BinanceApiError, Result};

fn invalid(msg: impl Into<String>) -> BinanceApiError {
    BinanceApiError::InvalidRequest(msg.into())
}

fn require_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(invalid("symbol must not be empty"));
    }
    Ok(())
}

/// Exactly one of the two order identifiers must be set.
fn require_one_order_id(order_id: Option<i64>, orig_client_order_id: Option<&str>) -> Result<()> {
    match (order_id, orig_client_order_id) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (None, None) => Err(invalid(
            "either order_id or orig_client_order_id must be provided",
        )),
        (Some(_), Some(_)) => Err(invalid(
            "order_id and orig_client_order_id are mutually exclusive",
        )),
    }
}

/// A new order.
///
/// `recv_window` and `timestamp` are filled at send time when left unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub time_in_force: Option<TimeInForce>,
    pub quantity: Option<Decimal>,
    pub quote_order_qty: Option<Decimal>,
    pub price: Option<Decimal>,
    pub new_client_order_id: Option<String>,
    pub stop_price: Option<Decimal>,
    pub iceberg_qty: Option<Decimal>,
    pub new_order_resp_type: NewOrderResponseType,
    pub recv_window: Option<u64>,
    pub timestamp: Option<i64>,
}

impl NewOrder {
    pub fn new(symbol: impl Into<String>, side: OrderSide, order_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type,
            time_in_force: None,
            quantity: None,
            quote_order_qty: None,
            price: None,
            new_client_order_id: None,
            stop_price: None,
            iceberg_qty: None,
            new_order_resp_type: NewOrderResponseType::default(),
            recv_window: None,
            timestamp: None,
        }
    }

    pub fn limit_buy(
        symbol: impl Into<String>,
        time_in_force: TimeInForce,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::limit(symbol, OrderSide::Buy, time_in_force, quantity, price)
    }

    pub fn limit_sell(
        symbol: impl Into<String>,
        time_in_force: TimeInForce,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self::limit(symbol, OrderSide::Sell, time_in_force, quantity, price)
    }

    fn limit(
        symbol: impl Into<String>,
        side: OrderSide,
        time_in_force: TimeInForce,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            time_in_force: Some(time_in_force),
            quantity: Some(quantity),
            price: Some(price),
            ..Self::new(symbol, side, OrderType::Limit)
        }
    }

    pub fn market_buy(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self::new(symbol, OrderSide::Buy, OrderType::Market).quantity(quantity)
    }

    pub fn market_sell(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self::new(symbol, OrderSide::Sell, OrderType::Market).quantity(quantity)
    }

    /// Market order sized in quote asset, e.g. "spend 100 USDT".
    pub fn market_buy_quote(symbol: impl Into<String>, quote_order_qty: Decimal) -> Self {
        Self {
            quote_order_qty: Some(quote_order_qty),
            ..Self::new(symbol, OrderSide::Buy, OrderType::Market)
        }
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn new_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(id.into());
        self
    }

    pub fn stop_price(mut self, stop_price: Decimal) -> Self {
        self.stop_price = Some(stop_price);
        self
    }

    pub fn iceberg_qty(mut self, iceberg_qty: Decimal) -> Self {
        self.iceberg_qty = Some(iceberg_qty);
        self
    }

    pub fn response_type(mut self, response_type: NewOrderResponseType) -> Self {
        self.new_order_resp_type = response_type;
        self
    }

    pub fn recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_symbol(&self.symbol)?;

        match (self.quantity, self.quote_order_qty) {
            (Some(qty), None) | (None, Some(qty)) if qty > Decimal::ZERO => {}
            (Some(_), None) | (None, Some(_)) => {
                return Err(invalid("order quantity must be positive"));
            }
            (None, None) => return Err(invalid("either quantity or quote_order_qty must be set")),
            (Some(_), Some(_)) => {
                return Err(invalid("quantity and quote_order_qty are mutually exclusive"));
            }
        }
        if self.quote_order_qty.is_some() && self.order_type != OrderType::Market {
            return Err(invalid("quote_order_qty is only valid for MARKET orders"));
        }

        if self.order_type.requires_price() {
            match self.price {
                Some(price) if price > Decimal::ZERO => {}
                Some(_) => return Err(invalid("price must be positive")),
                None => return Err(invalid(format!("{} orders require a price", self.order_type))),
            }
        }
        if self.order_type.requires_time_in_force() && self.time_in_force.is_none() {
            return Err(invalid(format!("{} orders require time_in_force", self.order_type)));
        }
        if self.order_type.requires_stop_price() && self.stop_price.is_none() {
            return Err(invalid(format!("{} orders require stop_price", self.order_type)));
        }
        Ok(())
    }
}

/// Look up one order by exchange id or by client id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusRequest {
    pub symbol: String,
    pub order_id: Option<i64>,
    pub orig_client_order_id: Option<String>,
    pub recv_window: Option<u64>,
    pub timestamp: Option<i64>,
}

impl OrderStatusRequest {
    pub fn by_order_id(symbol: impl Into<String>, order_id: i64) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: Some(order_id),
            orig_client_order_id: None,
            recv_window: None,
            timestamp: None,
        }
    }

    pub fn by_client_order_id(symbol: impl Into<String>, orig_client_order_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: None,
            orig_client_order_id: Some(orig_client_order_id.into()),
            recv_window: None,
            timestamp: None,
        }
    }

    pub fn recv_window(mut self, recv_window: u64) -> Self {
        self.recv_window = Some(recv_window);
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_symbol(&self.symbol)?;
        require_one_order_id(self.order_id, self.orig_client_order_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderRequest {
    pub symbol: String,
    pub order_id: Option<i64>,
    pub orig_client_order_id: Option<String>,
    /// New id for the cancel itself.
    pub new_client_order_id: Option<String>,
    pub recv_window: Option<u64>,
    pub timestamp: Option<i64>,
}

impl CancelOrderRequest {
    pub fn by_order_id(symbol: impl Into<String>, order_id: i64) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: Some(order_id),
            orig_client_order_id: None,
            new_client_order_id: None,
            recv_window: None,
            timestamp: None,
        }
    }

    pub fn by_client_order_id(symbol: impl Into<String>, orig_client_order_id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: None,
            orig_client_order_id: Some(orig_client_order_id.into()),
            new_client_order_id: None,
            recv_window: None,
            timestamp: None,
        }
    }

    pub fn new_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.new_client_order_id = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_symbol(&self.symbol)?;
        require_one_order_id(self.order_id, self.orig_client_order_id.as_deref())
    }
}

/// Open orders, for one symbol or for all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: Option<String>,
    pub recv_window: Option<u64>,
    pub timestamp: Option<i64>,
}

impl OrderRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: Some(symbol.into()),
            ..Self::default()
        }
    }

    pub fn all_symbols() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.symbol {
            Some(symbol) => require_symbol(symbol),
            None => Ok(()),
        }
    }
}

/// Order history for one symbol, optionally starting at `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllOrdersRequest {
    pub symbol: String,
    pub order_id: Option<i64>,
    pub limit: Option<u16>,
    pub recv_window: Option<u64>,
    pub timestamp: Option<i64>,
}

impl AllOrdersRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            order_id: None,
            limit: None,
            recv_window: None,
            timestamp: None,
        }
    }

    pub fn order_id(mut self, order_id: i64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn limit(mut self, limit: u16) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_symbol(&self.symbol)?;
        if self.limit == Some(0) {
            return Err(invalid("limit must be positive"));
        }
        Ok(())
    }
}
