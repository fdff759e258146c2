//! The cart value and its transitions.
//!
//! A [`Cart`] is an ordered list of [`Product`] entries, unique by id, kept
//! in the order products were first added. Every transition takes the
//! current cart by reference and returns the next one; nothing is mutated
//! in place.
//!
//! ```
//! use rocketshoes_core::{Cart, CatalogProduct, ProductId, Stock};
//! use rust_decimal::Decimal;
//!
//! let shoe = CatalogProduct {
//!     id: ProductId::new(1),
//!     name: "Shoe".to_string(),
//!     price: Decimal::from(10),
//!     image_url: "x".to_string(),
//! };
//! let stock = Stock { id: ProductId::new(1), amount: 5 };
//!
//! let cart = Cart::new().with_added(shoe, &stock).unwrap();
//! assert_eq!(cart.get(ProductId::new(1)).map(|p| p.amount), Some(1));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::product::{CatalogProduct, Product, Stock};

/// A cart rule that a transition would break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartRuleViolation {
    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The requested quantity exceeds the units in stock.
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Two entries share the same product id.
    #[error("product {0} appears more than once")]
    DuplicateEntry(ProductId),

    /// An entry would hold zero units.
    #[error("product {0} has no units")]
    EmptyLine(ProductId),
}

/// Ordered, id-unique collection of products the customer intends to buy.
///
/// Serializes as a bare JSON array of [`Product`]. Deserializing goes
/// through [`Cart::from_entries`], so a decoded cart always obeys the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart(Vec<Product>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a cart from existing entries, checking the cart rules.
    ///
    /// # Errors
    ///
    /// Returns [`CartRuleViolation::DuplicateEntry`] if two entries share an
    /// id, or [`CartRuleViolation::EmptyLine`] if an entry holds no units.
    pub fn from_entries(entries: Vec<Product>) -> Result<Self, CartRuleViolation> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.amount == 0 {
                return Err(CartRuleViolation::EmptyLine(entry.id));
            }
            if entries.iter().skip(index + 1).any(|other| other.id == entry.id) {
                return Err(CartRuleViolation::DuplicateEntry(entry.id));
            }
        }
        Ok(Self(entries))
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart gets its amount incremented, keeping
    /// the metadata it was added with. A new product is appended with an
    /// amount of 1; `stock` is only consulted for products already present.
    ///
    /// # Errors
    ///
    /// Returns [`CartRuleViolation::InsufficientStock`] if the extra unit
    /// for a product already in the cart would exceed `stock.amount`.
    pub fn with_added(
        &self,
        product: CatalogProduct,
        stock: &Stock,
    ) -> Result<Self, CartRuleViolation> {
        let Some(current) = self.get(product.id).map(|entry| entry.amount) else {
            let mut entries = self.0.clone();
            entries.push(product.into_cart_entry(1));
            return Ok(Self(entries));
        };

        let requested = current.saturating_add(1);
        if requested > stock.amount {
            return Err(CartRuleViolation::InsufficientStock {
                product_id: product.id,
                requested,
                available: stock.amount,
            });
        }

        Ok(self.replacing_amount(product.id, requested))
    }

    /// Remove a product entirely, keeping the order of the other entries.
    ///
    /// # Errors
    ///
    /// Returns [`CartRuleViolation::NotInCart`] if the product is absent.
    pub fn without(&self, product_id: ProductId) -> Result<Self, CartRuleViolation> {
        if !self.contains(product_id) {
            return Err(CartRuleViolation::NotInCart(product_id));
        }

        Ok(Self(
            self.0
                .iter()
                .filter(|entry| entry.id != product_id)
                .cloned()
                .collect(),
        ))
    }

    /// Set the amount of a product already in the cart.
    ///
    /// # Errors
    ///
    /// - [`CartRuleViolation::EmptyLine`] if `amount` is zero
    /// - [`CartRuleViolation::NotInCart`] if the product is absent
    /// - [`CartRuleViolation::InsufficientStock`] if `amount` exceeds `stock.amount`
    pub fn with_amount(
        &self,
        product_id: ProductId,
        amount: u32,
        stock: &Stock,
    ) -> Result<Self, CartRuleViolation> {
        if amount == 0 {
            return Err(CartRuleViolation::EmptyLine(product_id));
        }
        if !self.contains(product_id) {
            return Err(CartRuleViolation::NotInCart(product_id));
        }
        if amount > stock.amount {
            return Err(CartRuleViolation::InsufficientStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        Ok(self.replacing_amount(product_id, amount))
    }

    fn replacing_amount(&self, product_id: ProductId, amount: u32) -> Self {
        Self(
            self.0
                .iter()
                .map(|entry| {
                    if entry.id == product_id {
                        Product {
                            amount,
                            ..entry.clone()
                        }
                    } else {
                        entry.clone()
                    }
                })
                .collect(),
        )
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.0.iter().find(|entry| entry.id == product_id)
    }

    /// Whether the product is in the cart.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.0.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &[Product] {
        &self.0
    }

    /// Total units across all entries (the header badge count).
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.0.iter().map(|entry| u64::from(entry.amount)).sum()
    }

    /// Sum of `price × amount` over all entries, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.0
            .iter()
            .map(Product::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = CartRuleViolation;

    fn try_from(entries: Vec<Product>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.0
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
