/*
[INPUT]:  Validated order request objects
[OUTPUT]: Order placement, lookup and cancellation results
[POS]:    HTTP layer - trading endpoints (signed)
[UPDATE]: When adding trading endpoints or changing order parameters
*/

use crate::http::Result;
use crate::http::client::{RestClient, with_signing_window};
use crate::http::endpoints;
use crate::http::executor::ExecutionMode;
use crate::http::request::Params;
use crate::types::{
    AllOrdersRequest, CancelOrderRequest, CancelOrderResponse, NewOrder, NewOrderResponse, Order,
    OrderRequest, OrderStatusRequest,
};

/// Parameters shared by `order` and `order/test`, in declared order.
fn new_order_params(order: &NewOrder) -> Result<Params> {
    order.validate()?;
    let params = Params::new()
        .with("symbol", &order.symbol)
        .with("side", order.side)
        .with("type", order.order_type)
        .with_opt("timeInForce", order.time_in_force)
        .with_opt("quantity", order.quantity)
        .with_opt("quoteOrderQty", order.quote_order_qty)
        .with_opt("price", order.price)
        .with_opt("newClientOrderId", order.new_client_order_id.as_deref())
        .with_opt("stopPrice", order.stop_price)
        .with_opt("icebergQty", order.iceberg_qty)
        .with("newOrderRespType", order.new_order_resp_type);
    Ok(with_signing_window(params, order.recv_window, order.timestamp))
}

impl<M: ExecutionMode> RestClient<M> {
    /// Place an order.
    ///
    /// POST /api/v3/order
    pub fn new_order(&self, order: &NewOrder) -> M::Output<NewOrderResponse> {
        let call = new_order_params(order)
            .and_then(|params| self.call::<NewOrderResponse>(&endpoints::NEW_ORDER, params));
        self.dispatch(call)
    }

    /// Validate an order on the exchange without placing it.
    ///
    /// POST /api/v3/order/test
    pub fn new_order_test(&self, order: &NewOrder) -> M::Output<()> {
        let call = new_order_params(order)
            .and_then(|params| self.call::<serde::de::IgnoredAny>(&endpoints::NEW_ORDER_TEST, params))
            .map(|call| call.map(|_| ()));
        self.dispatch(call)
    }

    /// GET /api/v3/order
    pub fn get_order_status(&self, request: &OrderStatusRequest) -> M::Output<Order> {
        let call = request.validate().and_then(|()| {
            let params = Params::new()
                .with("symbol", &request.symbol)
                .with_opt("orderId", request.order_id)
                .with_opt("origClientOrderId", request.orig_client_order_id.as_deref());
            self.call::<Order>(
                &endpoints::ORDER_STATUS,
                with_signing_window(params, request.recv_window, request.timestamp),
            )
        });
        self.dispatch(call)
    }

    /// DELETE /api/v3/order
    pub fn cancel_order(&self, request: &CancelOrderRequest) -> M::Output<CancelOrderResponse> {
        let call = request.validate().and_then(|()| {
            let params = Params::new()
                .with("symbol", &request.symbol)
                .with_opt("orderId", request.order_id)
                .with_opt("origClientOrderId", request.orig_client_order_id.as_deref())
                .with_opt("newClientOrderId", request.new_client_order_id.as_deref());
            self.call::<CancelOrderResponse>(
                &endpoints::CANCEL_ORDER,
                with_signing_window(params, request.recv_window, request.timestamp),
            )
        });
        self.dispatch(call)
    }

    /// GET /api/v3/openOrders
    pub fn get_open_orders(&self, request: &OrderRequest) -> M::Output<Vec<Order>> {
        let call = request.validate().and_then(|()| {
            let params = Params::new().with_opt("symbol", request.symbol.as_deref());
            self.call::<Vec<Order>>(
                &endpoints::OPEN_ORDERS,
                with_signing_window(params, request.recv_window, request.timestamp),
            )
        });
        self.dispatch(call)
    }

    /// GET /api/v3/allOrders
    pub fn get_all_orders(&self, request: &AllOrdersRequest) -> M::Output<Vec<Order>> {
        let call = request.validate().and_then(|()| {
            let params = Params::new()
                .with("symbol", &request.symbol)
                .with_opt("orderId", request.order_id)
                .with_opt("limit", request.limit);
            self.call::<Vec<Order>>(
                &endpoints::ALL_ORDERS,
                with_signing_window(params, request.recv_window, request.timestamp),
            )
        });
        self.dispatch(call)
    }
}
