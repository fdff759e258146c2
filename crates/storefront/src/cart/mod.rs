//! Cart manager: the one place cart state changes.
//!
//! # Operations
//!
//! ```text
//! add_product(id)                    - +1 unit, checked against fresh stock
//! remove_product(id)                 - drop the entry
//! update_product_amount({id, n})     - set units, checked against fresh stock
//! clear()                            - empty the cart
//! ```
//!
//! Each operation comes in two forms. `try_*` returns the [`CartError`] to
//! the caller. The plain form hands the error's message to the
//! [`Notifier`] instead and returns normally, so the UI only ever
//! re-renders from [`CartManager::cart`].
//!
//! Every mutation computes the next [`Cart`] first, writes it to the store,
//! and only then swaps it in. A failed write leaves the in-memory cart as
//! it was.

mod error;

use rocketshoes_core::{Cart, CartRuleViolation, Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub use error::CartError;

use crate::catalog::CatalogService;
use crate::notify::Notifier;
use crate::store::{PersistentStore, StoreError};

/// Store key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a product's quantity.
///
/// `amount` is signed: zero and negative requests are valid input and are
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Owns the cart and applies every change to it.
pub struct CartManager<C, S, N> {
    catalog: C,
    store: S,
    notifier: N,
    cart: Cart,
}

impl<C, S, N> CartManager<C, S, N>
where
    C: CatalogService,
    S: PersistentStore,
    N: Notifier,
{
    /// Create a manager, loading the cart saved in `store`.
    ///
    /// A missing or unreadable saved cart starts the manager empty.
    pub fn new(catalog: C, store: S, notifier: N) -> Self {
        let cart = load_cart(&store);
        tracing::debug!(entries = cart.len(), "Cart loaded");

        Self {
            catalog,
            store,
            notifier,
            cart,
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    // =========================================================================
    // Notifying operations
    // =========================================================================

    /// Add one unit of a product, notifying on failure.
    pub async fn add_product(&mut self, product_id: ProductId) -> &Cart {
        let result = self.try_add_product(product_id).await;
        self.settle(result)
    }

    /// Remove a product, notifying on failure.
    pub fn remove_product(&mut self, product_id: ProductId) -> &Cart {
        let result = self.try_remove_product(product_id);
        self.settle(result)
    }

    /// Set a product's quantity, notifying on failure.
    pub async fn update_product_amount(&mut self, request: UpdateProductAmount) -> &Cart {
        let result = self.try_update_product_amount(request).await;
        self.settle(result)
    }

    /// Empty the cart, notifying on failure.
    pub fn clear(&mut self) -> &Cart {
        let result = self.try_clear();
        self.settle(result)
    }

    // =========================================================================
    // Fallible operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// Stock and product metadata are fetched concurrently; both must
    /// succeed.
    ///
    /// # Errors
    ///
    /// - [`CartError::AdditionFailed`] if either catalog lookup fails
    /// - [`CartError::InsufficientStock`] if no more units are available
    /// - [`CartError::Persistence`] if the new cart cannot be stored
    #[instrument(skip(self))]
    pub async fn try_add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let (stock, product) = tokio::try_join!(
            self.catalog.stock(product_id),
            self.catalog.product(product_id)
        )
        .map_err(CartError::AdditionFailed)?;

        let next = self
            .cart
            .with_added(product, &stock)
            .map_err(CartError::InsufficientStock)?;

        self.commit(next)?;
        tracing::info!(
            amount = self.cart.get(product_id).map_or(0, |entry| entry.amount),
            "Product added to cart"
        );
        Ok(())
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::RemovalFailed`] if the product is not in the cart
    /// - [`CartError::Persistence`] if the new cart cannot be stored
    #[instrument(skip(self))]
    pub fn try_remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let next = self
            .cart
            .without(product_id)
            .map_err(CartError::RemovalFailed)?;

        self.commit(next)?;
        tracing::info!("Product removed from cart");
        Ok(())
    }

    /// Set a product's quantity.
    ///
    /// Amounts below 1 are ignored without error and without a catalog call.
    ///
    /// # Errors
    ///
    /// - [`CartError::AmountUpdateFailed`] if the product is not in the cart
    ///   or its stock cannot be fetched
    /// - [`CartError::InsufficientStock`] if `amount` exceeds the stock
    /// - [`CartError::Persistence`] if the new cart cannot be stored
    #[instrument(skip(self))]
    pub async fn try_update_product_amount(
        &mut self,
        request: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = request;

        if amount < 1 {
            tracing::debug!("Ignoring non-positive amount");
            return Ok(());
        }

        if !self.cart.contains(product_id) {
            return Err(CartError::AmountUpdateFailed {
                product_id,
                source: None,
            });
        }

        let stock = self
            .catalog
            .stock(product_id)
            .await
            .map_err(|e| CartError::AmountUpdateFailed {
                product_id,
                source: Some(e),
            })?;

        let next = match u32::try_from(amount) {
            Ok(amount) => self.cart.with_amount(product_id, amount, &stock),
            Err(_) => Err(CartRuleViolation::InsufficientStock {
                product_id,
                requested: u32::MAX,
                available: stock.amount,
            }),
        }
        .map_err(|violation| match violation {
            CartRuleViolation::InsufficientStock { .. } => CartError::InsufficientStock(violation),
            _ => CartError::AmountUpdateFailed {
                product_id,
                source: None,
            },
        })?;

        self.commit(next)?;
        tracing::info!(amount, "Product amount updated");
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persistence`] if the empty cart cannot be stored.
    #[instrument(skip(self))]
    pub fn try_clear(&mut self) -> Result<(), CartError> {
        self.commit(Cart::new())?;
        tracing::info!("Cart cleared");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Write `next` to the store, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&next)?;
        self.store.set(CART_STORAGE_KEY, &serialized)?;
        self.cart = next;
        Ok(())
    }

    /// Turn a failed operation into a notification.
    fn settle(&self, result: Result<(), CartError>) -> &Cart {
        if let Err(err) = result {
            let cause = std::error::Error::source(&err).map(ToString::to_string);
            let cause = cause.as_deref().unwrap_or("-");
            if err.is_rejection() {
                tracing::info!(kind = err.kind(), error = %err, cause, "Cart change rejected");
            } else {
                tracing::warn!(kind = err.kind(), error = %err, cause, "Cart operation failed");
            }
            self.notifier.error(&err.to_string());
        }
        &self.cart
    }
}

/// Read the saved cart, falling back to an empty one.
fn load_cart<S: PersistentStore>(store: &S) -> Cart {
    let raw = match store.get(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read saved cart, starting empty");
            return Cart::new();
        }
    };

    let entries = match serde_json::from_str::<Vec<Product>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "Saved cart is not valid JSON, starting empty");
            return Cart::new();
        }
    };

    Cart::from_entries(entries).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Saved cart breaks cart rules, starting empty");
        Cart::new()
    })
}
