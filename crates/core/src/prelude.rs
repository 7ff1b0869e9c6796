//! Panier prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, Section},
    catalog::{BasketUuid, CatalogEntry, CatalogRef, ItemKind, ProductUuid},
    checkout::{Checkout, CheckoutError, Confirmation, GateError, check_gate},
    delivery::{DeliveryForm, DeliveryFormError, DeliveryInfo, PhoneError, PhoneNumber},
    orders::{
        OrderGateway, OrderGatewayError, OrderLine, OrderNumber, OrderRequest,
    },
    payment::{PaymentMethod, UnknownPaymentMethod},
    receipt::{Receipt, ReceiptError},
    storage::{CartStorage, JsonFileStorage, MemoryStorage, StorageError},
    store::CartStore,
};
