//! Catalog references
//!
//! The storefront sells from two otherwise-identical catalog tables: loose
//! products and composed subscription baskets. A cart line is keyed by the
//! pair of entity id and table, expressed here as [`CatalogRef`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a row in the products table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductUuid(Uuid);

impl ProductUuid {
    /// Wraps a raw UUID as a product identifier.
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the raw UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for ProductUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Identifier of a row in the baskets table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketUuid(Uuid);

impl BasketUuid {
    /// Wraps a raw UUID as a basket identifier.
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the raw UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for BasketUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Which catalog table an entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A loose product sold by unit or weight.
    Product,

    /// A composed subscription basket.
    Basket,
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Product => f.write_str("produit"),
            Self::Basket => f.write_str("panier"),
        }
    }
}

/// Reference to a catalog entity, unique per cart.
///
/// The two catalog tables share an id space only by accident, so the table is
/// part of the key: the same UUID as a product and as a basket are two
/// distinct cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CatalogRef {
    /// A products-table row.
    Product(ProductUuid),

    /// A baskets-table row.
    Basket(BasketUuid),
}

impl CatalogRef {
    /// The catalog table this reference points into.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Product(_) => ItemKind::Product,
            Self::Basket(_) => ItemKind::Basket,
        }
    }

    /// The raw UUID of the referenced row.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Product(product) => product.into_uuid(),
            Self::Basket(basket) => basket.into_uuid(),
        }
    }
}

/// A browsable catalog entry, as surfaced by the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Identity of the entry.
    pub reference: CatalogRef,

    /// Display name.
    pub name: String,

    /// Price in the smallest currency unit (whole FCFA).
    pub unit_price: u64,

    /// Sale unit shown next to the price, e.g. `"kg"` or `"botte"`.
    pub unit_label: Option<String>,

    /// Opaque reference to the entry's picture, if any.
    pub image_ref: Option<String>,
}
