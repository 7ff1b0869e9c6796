//! Order gateway
//!
//! The seam to the external order-creation procedure. The procedure is atomic
//! and authoritative: it creates the order with its lines and decrements
//! stock in one step, returning an order number or a rejection. This side
//! never compensates for partial failure because none is observable.

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::CartLine,
    catalog::CatalogRef,
    delivery::DeliveryInfo,
    payment::PaymentMethod,
};

/// One order line as submitted to the procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    #[serde(flatten)]
    reference: CatalogRef,
    quantity: u32,
    unit_price: u64,
}

impl OrderLine {
    /// The referenced catalog entity.
    #[must_use]
    pub fn reference(&self) -> CatalogRef {
        self.reference
    }

    /// Quantity ordered.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price in whole FCFA at submission time.
    #[must_use]
    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            reference: line.reference(),
            quantity: line.quantity().get(),
            unit_price: line.unit_price(),
        }
    }
}

/// The full payload of one submission attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    #[serde(flatten)]
    buyer: DeliveryInfo,
    payment_method: PaymentMethod,
    items: Vec<OrderLine>,
}

impl OrderRequest {
    /// Builds a request from validated buyer info and the cart lines.
    #[must_use]
    pub fn new(buyer: DeliveryInfo, payment_method: PaymentMethod, lines: &[CartLine]) -> Self {
        Self {
            buyer,
            payment_method,
            items: lines.iter().map(OrderLine::from).collect(),
        }
    }

    /// Validated buyer info.
    #[must_use]
    pub fn buyer(&self) -> &DeliveryInfo {
        &self.buyer
    }

    /// Chosen payment method.
    #[must_use]
    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Submitted lines.
    #[must_use]
    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }
}

/// Error for blank order numbers in procedure responses.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("order number must not be empty")]
pub struct EmptyOrderNumber;

/// A generated order number, e.g. `CMD-042`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Wraps a non-blank order number.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyOrderNumber`] when the input is empty or whitespace.
    pub fn new(number: impl Into<String>) -> Result<Self, EmptyOrderNumber> {
        let number = number.into();

        if number.trim().is_empty() {
            return Err(EmptyOrderNumber);
        }

        Ok(Self(number))
    }

    /// The order number as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = EmptyOrderNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Failures of the order-creation procedure.
#[derive(Debug, Error)]
pub enum OrderGatewayError {
    /// The procedure ran and refused the order (e.g. insufficient stock).
    /// The message is surfaced to the buyer verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The procedure could not be reached or answered something
    /// uninterpretable.
    #[error("connection error")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// The external order-creation procedure.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Invokes the remote procedure exactly once.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderGatewayError`]: a rejection with the backend's
    /// message, or a connection failure.
    async fn create_order(&self, order: OrderRequest) -> Result<OrderNumber, OrderGatewayError>;
}

#[async_trait]
impl<G: OrderGateway + ?Sized> OrderGateway for Box<G> {
    async fn create_order(&self, order: OrderRequest) -> Result<OrderNumber, OrderGatewayError> {
        (**self).create_order(order).await
    }
}
