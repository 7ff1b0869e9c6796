//! Panier client
//!
//! Consumer of the hosted relational backend: the order-creation remote
//! procedure and read-only access to the two catalog tables, both spoken
//! over the backend's REST surface with a static API key.

pub mod catalog;
pub mod config;
pub mod orders;

pub use catalog::{CatalogClient, CatalogError};
pub use config::BackendConfig;
pub use orders::RpcOrderGateway;
