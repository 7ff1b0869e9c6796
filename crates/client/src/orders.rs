//! Order-creation gateway
//!
//! Speaks to the `create_anonymous_order` stored procedure through the
//! backend's RPC endpoint. The procedure is all-or-nothing: it creates the
//! order and its lines and decrements stock in one transaction, answering
//! either an order number or a refusal message.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use panier::orders::{OrderGateway, OrderGatewayError, OrderNumber, OrderRequest};

use crate::config::BackendConfig;

const CREATE_ORDER_RPC: &str = "rpc/create_anonymous_order";

/// HTTP implementation of the order gateway.
#[derive(Debug, Clone)]
pub struct RpcOrderGateway {
    config: BackendConfig,
    http: Client,
}

impl RpcOrderGateway {
    /// Creates a gateway from the given configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl OrderGateway for RpcOrderGateway {
    async fn create_order(&self, order: OrderRequest) -> Result<OrderNumber, OrderGatewayError> {
        let url = self.config.rest_url(CREATE_ORDER_RPC);

        debug!(items = order.items().len(), "submitting order");

        let response = self
            .http
            .post(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .json(&order)
            .send()
            .await
            .map_err(connection)?;

        let status = response.status();
        let body = response.text().await.map_err(connection)?;

        interpret_response(status, &body)
    }
}

fn connection(error: reqwest::Error) -> OrderGatewayError {
    OrderGatewayError::Connection(Box::new(error))
}

/// Body of a completed procedure call.
#[derive(Debug, Deserialize)]
struct RpcOutcome {
    success: bool,
    #[serde(default)]
    order_number: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Error body produced by the REST layer when the procedure raises.
#[derive(Debug, Deserialize)]
struct RestError {
    message: String,
}

/// Maps a `(status, body)` pair to the gateway outcome.
///
/// A 2xx answer carries the procedure's own `{success, ...}` envelope; a
/// raised exception comes back as a non-2xx REST error with a `message`.
/// Anything else is a connection-level failure.
fn interpret_response(status: StatusCode, body: &str) -> Result<OrderNumber, OrderGatewayError> {
    if status.is_success() {
        let outcome: RpcOutcome = serde_json::from_str(body)
            .map_err(|error| OrderGatewayError::Connection(Box::new(error)))?;

        if outcome.success {
            let number = outcome.order_number.unwrap_or_default();

            return OrderNumber::new(number)
                .map_err(|error| OrderGatewayError::Connection(Box::new(error)));
        }

        let message = outcome
            .error
            .unwrap_or_else(|| "commande refusée".to_string());

        return Err(OrderGatewayError::Rejected(message));
    }

    if let Ok(rest_error) = serde_json::from_str::<RestError>(body) {
        return Err(OrderGatewayError::Rejected(rest_error.message));
    }

    Err(OrderGatewayError::Connection(
        format!("unexpected response status {status}").into(),
    ))
}
