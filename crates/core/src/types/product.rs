//! Catalog records and cart entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Product metadata as served by the catalog (`GET /products/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    /// Unit price, carried as a JSON number on the wire.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
}

impl CatalogProduct {
    /// Turn catalog metadata into a cart entry holding `amount` units.
    #[must_use]
    pub fn into_cart_entry(self, amount: u32) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            image_url: self.image_url,
            amount,
        }
    }
}

/// A product held in the cart, with the quantity the customer wants.
///
/// This is also the persisted shape: the stored cart is a JSON array of
/// these, `amount` included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
    /// Units held in the cart. Always at least 1.
    pub amount: u32,
}

impl Product {
    /// Price of this line (`price × amount`), saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.amount))
    }
}

/// Units available for a product (`GET /stock/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
