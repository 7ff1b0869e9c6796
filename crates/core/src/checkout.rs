//! Checkout
//!
//! Validates readiness, submits the order once, and reacts to the outcome.
//! There is no retry and no idempotency key: the external procedure's
//! contract does not offer one, so a duplicate user action can create a
//! duplicate order. Callers keep their submit control disabled while a call
//! is in flight; the exclusive borrow taken by [`Checkout::submit`] encodes
//! the same single-flight rule in the API.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::Cart,
    delivery::{DeliveryForm, DeliveryFormError, DeliveryInfo},
    orders::{OrderGateway, OrderGatewayError, OrderNumber, OrderRequest},
    payment::PaymentMethod,
    receipt::Receipt,
    storage::CartStorage,
    store::CartStore,
};

/// Why submission is currently disabled.
///
/// These are preconditions, not failures: the storefront keeps the submit
/// control disabled while one holds, it does not surface them as errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The delivery form does not validate.
    #[error(transparent)]
    Delivery(#[from] DeliveryFormError),
}

/// Checks the submission gate: a non-empty cart and a valid delivery form.
///
/// Returns the validated buyer info, ready for submission.
///
/// # Errors
///
/// Returns the first failing precondition as a [`GateError`].
pub fn check_gate(cart: &Cart, form: &DeliveryForm) -> Result<DeliveryInfo, GateError> {
    if cart.is_empty() {
        return Err(GateError::EmptyCart);
    }

    Ok(form.validate()?)
}

/// Submission failures, as surfaced to the buyer.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The gate was not actually open; nothing was submitted.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// The procedure refused the order; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Transport or other unexpected failure, shown as a generic
    /// connection problem.
    #[error("connection error")]
    Connection(#[source] OrderGatewayError),
}

/// Outcome of a confirmed order: the number and the re-renderable receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    order_number: OrderNumber,
    receipt: Receipt,
}

impl Confirmation {
    /// The confirmed order number.
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// The receipt built from the pre-clear snapshot.
    #[must_use]
    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }
}

/// Checkout orchestrator over an order gateway.
#[derive(Debug)]
pub struct Checkout<G> {
    gateway: G,
}

impl<G: OrderGateway> Checkout<G> {
    /// Creates an orchestrator submitting through `gateway`.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    /// Submits the cart as an order, exactly once.
    ///
    /// On success the receipt is built from a snapshot taken before the cart
    /// is cleared, then the cart is cleared and the confirmation returned.
    /// On any failure the cart and form are left untouched so the buyer can
    /// correct and resubmit.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`]: a closed gate, a verbatim rejection, or
    /// a generic connection failure.
    pub async fn submit<S: CartStorage>(
        &self,
        store: &mut CartStore<S>,
        form: &DeliveryForm,
        payment: PaymentMethod,
    ) -> Result<Confirmation, CheckoutError> {
        let buyer = check_gate(store.cart(), form)?;
        let request = OrderRequest::new(buyer.clone(), payment, store.cart().lines());

        let order_number = match self.gateway.create_order(request).await {
            Ok(order_number) => order_number,
            Err(OrderGatewayError::Rejected(message)) => {
                warn!(%message, "order rejected by backend");

                return Err(CheckoutError::Rejected(message));
            }
            Err(error) => {
                warn!(%error, "order submission failed");

                return Err(CheckoutError::Connection(error));
            }
        };

        // The receipt must reflect what was submitted: snapshot the lines
        // before clearing, the store is about to be emptied.
        let receipt = Receipt::new(
            order_number.clone(),
            buyer,
            payment,
            store.cart().lines().to_vec(),
            Timestamp::now(),
        );

        store.clear();

        info!(order = %order_number, "order confirmed");

        Ok(Confirmation {
            order_number,
            receipt,
        })
    }
}
