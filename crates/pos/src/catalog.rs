//! Catalog sources
//!
//! The terminal browses either the hosted backend's catalog or a YAML
//! fixture: a named file, or the bundled demo catalog when nothing else is
//! configured.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use panier::catalog::{BasketUuid, CatalogEntry, CatalogRef, ProductUuid};

const DEMO_CATALOG_YAML: &str = include_str!("../../../fixtures/catalog/demo.yml");

/// Errors while loading a catalog fixture.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    /// The fixture file could not be read.
    #[error("failed to read catalog file")]
    Io(#[from] std::io::Error),

    /// The fixture does not parse.
    #[error("invalid catalog fixture")]
    Parse(#[from] serde_norway::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    #[serde(default)]
    products: Vec<ProductFixture>,

    #[serde(default)]
    baskets: Vec<BasketFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: Uuid,
    name: String,
    price: u64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BasketFixture {
    id: Uuid,
    name: String,
    price: u64,
    #[serde(default)]
    image: Option<String>,
}

/// Loads the bundled demo catalog.
///
/// # Errors
///
/// Returns a [`CatalogLoadError`] if the bundled fixture is invalid.
pub fn demo_catalog() -> Result<Vec<CatalogEntry>, CatalogLoadError> {
    parse(DEMO_CATALOG_YAML)
}

/// Loads a catalog fixture from a file.
///
/// # Errors
///
/// Returns a [`CatalogLoadError`] if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<Vec<CatalogEntry>, CatalogLoadError> {
    let yaml = std::fs::read_to_string(path)?;

    parse(&yaml)
}

fn parse(yaml: &str) -> Result<Vec<CatalogEntry>, CatalogLoadError> {
    let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

    let products = fixture.products.into_iter().map(|p| CatalogEntry {
        reference: CatalogRef::Product(ProductUuid::new(p.id)),
        name: p.name,
        unit_price: p.price,
        unit_label: p.unit,
        image_ref: p.image,
    });

    let baskets = fixture.baskets.into_iter().map(|b| CatalogEntry {
        reference: CatalogRef::Basket(BasketUuid::new(b.id)),
        name: b.name,
        unit_price: b.price,
        unit_label: None,
        image_ref: b.image,
    });

    Ok(products.chain(baskets).collect())
}
