//! Catalog service: product metadata and stock levels.
//!
//! # Endpoints
//!
//! ```text
//! GET /stock/{id}     -> { "id": 1, "amount": 5 }
//! GET /products/{id}  -> { "id": 1, "name": "...", "price": 179.9, "imageUrl": "..." }
//! ```
//!
//! Both lookups are read-only and idempotent. Nothing is cached: the cart
//! asks for fresh stock on every add and update.

mod client;

use std::future::Future;

use rocketshoes_core::{CatalogProduct, ProductId, Stock};
use thiserror::Error;

pub use client::HttpCatalogClient;

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog has no record for the requested resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Read-only lookups against the catalog.
///
/// Implementations must be thread-safe (`Send + Sync`) and return `Send`
/// futures so the cart can be driven from a multi-threaded runtime.
pub trait CatalogService: Send + Sync {
    /// Current stock level for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails for any reason.
    fn stock(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Stock, CatalogError>> + Send;

    /// Product metadata (name, price, image).
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails for any reason.
    fn product(
        &self,
        product_id: ProductId,
    ) -> impl Future<Output = Result<CatalogProduct, CatalogError>> + Send;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory catalog for unit tests.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;

    use super::*;

    #[derive(Default)]
    pub struct FakeCatalog {
        stock: Mutex<HashMap<ProductId, u32>>,
        products: HashMap<ProductId, CatalogProduct>,
        broken_stock: Vec<ProductId>,
        broken_products: Vec<ProductId>,
        pub stock_calls: AtomicUsize,
    }

    impl FakeCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a product with `name`, `price` and `amount` units in stock.
        pub fn with_product(mut self, id: i32, name: &str, price: i64, amount: u32) -> Self {
            let product_id = ProductId::new(id);
            self.products.insert(
                product_id,
                CatalogProduct {
                    id: product_id,
                    name: name.to_string(),
                    price: Decimal::from(price),
                    image_url: "x".to_string(),
                },
            );
            self.stock
                .get_mut()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(product_id, amount);
            self
        }

        /// Make stock lookups for `id` fail while product lookups still work.
        pub fn with_broken_stock(mut self, id: i32) -> Self {
            self.broken_stock.push(ProductId::new(id));
            self
        }

        /// Make product lookups for `id` fail while stock lookups still work.
        pub fn with_broken_product(mut self, id: i32) -> Self {
            self.broken_products.push(ProductId::new(id));
            self
        }

        pub fn set_stock(&self, id: i32, amount: u32) {
            self.stock
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(ProductId::new(id), amount);
        }
    }

    impl CatalogService for FakeCatalog {
        async fn stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            if self.broken_stock.contains(&product_id) {
                return Err(CatalogError::Api {
                    status: 500,
                    message: "stock service unavailable".to_string(),
                });
            }
            self.stock
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .get(&product_id)
                .map(|&amount| Stock {
                    id: product_id,
                    amount,
                })
                .ok_or_else(|| CatalogError::NotFound(format!("/stock/{product_id}")))
        }

        async fn product(&self, product_id: ProductId) -> Result<CatalogProduct, CatalogError> {
            if self.broken_products.contains(&product_id) {
                return Err(CatalogError::Parse("missing field `name`".to_string()));
            }
            self.products
                .get(&product_id)
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("/products/{product_id}")))
        }
    }
}
