//! Catalog access
//!
//! Read-only views over the two catalog tables (`produits` and `paniers`).
//! The schema is the hosted backend's francophone one; rows map into the
//! core's [`CatalogEntry`] with prices decoded into unsigned whole FCFA.

use std::num::TryFromIntError;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use panier::catalog::{BasketUuid, CatalogEntry, CatalogRef, ProductUuid};

use crate::config::BackendConfig;

/// Errors while fetching or decoding catalog rows.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request failed or the backend answered a non-success status.
    #[error("catalog request failed")]
    Http(#[from] reqwest::Error),

    /// A row carried a negative price.
    #[error("invalid price value")]
    InvalidPrice(#[from] TryFromIntError),
}

/// A `produits` row, as served by the backend.
#[derive(Debug, Deserialize)]
struct ProductRow {
    id: Uuid,
    nom: String,
    prix: i64,
    #[serde(default)]
    unite: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

/// A `paniers` row, as served by the backend.
#[derive(Debug, Deserialize)]
struct BasketRow {
    id: Uuid,
    nom: String,
    prix: i64,
    #[serde(default)]
    image_url: Option<String>,
}

/// Read-only client for the storefront catalog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    config: BackendConfig,
    http: Client,
}

impl CatalogClient {
    /// Creates a catalog client from the given configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Lists available products, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on transport failure or a bad row.
    pub async fn list_products(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let rows: Vec<ProductRow> = self
            .fetch(
                "produits",
                &[
                    ("select", "id,nom,prix,unite,image_url"),
                    ("disponible", "eq.true"),
                    ("order", "nom.asc"),
                ],
            )
            .await?;

        debug!(count = rows.len(), "fetched products");

        rows.into_iter().map(product_entry).collect()
    }

    /// Lists available subscription baskets, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on transport failure or a bad row.
    pub async fn list_baskets(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let rows: Vec<BasketRow> = self
            .fetch(
                "paniers",
                &[
                    ("select", "id,nom,prix,image_url"),
                    ("disponible", "eq.true"),
                    ("order", "nom.asc"),
                ],
            )
            .await?;

        debug!(count = rows.len(), "fetched baskets");

        rows.into_iter().map(basket_entry).collect()
    }

    /// The full browsable catalog: products first, then baskets.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on transport failure or a bad row.
    pub async fn list_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut entries = self.list_products().await?;

        entries.extend(self.list_baskets().await?);

        Ok(entries)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, CatalogError> {
        let rows = self
            .http
            .get(self.config.rest_url(resource))
            .query(query)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows)
    }
}

fn product_entry(row: ProductRow) -> Result<CatalogEntry, CatalogError> {
    Ok(CatalogEntry {
        reference: CatalogRef::Product(ProductUuid::new(row.id)),
        name: row.nom,
        unit_price: u64::try_from(row.prix)?,
        unit_label: row.unite,
        image_ref: row.image_url,
    })
}

fn basket_entry(row: BasketRow) -> Result<CatalogEntry, CatalogError> {
    Ok(CatalogEntry {
        reference: CatalogRef::Basket(BasketUuid::new(row.id)),
        name: row.nom,
        unit_price: u64::try_from(row.prix)?,
        unit_label: None,
        image_ref: row.image_url,
    })
}
