//! Cart commands.
//!
//! Each command loads the saved cart, applies one operation through the same
//! [`CartManager`] the storefront uses, prints the result and reports any
//! notification the operation raised.

use std::path::Path;

use rocketshoes_core::{Cart, ProductId};
use rocketshoes_storefront::cart::{CartManager, UpdateProductAmount};
use rocketshoes_storefront::catalog::{CatalogError, HttpCatalogClient};
use rocketshoes_storefront::config::{CatalogConfig, ConfigError};
use rocketshoes_storefront::notify::NotificationQueue;
use rocketshoes_storefront::store::{FileStore, StoreError};

/// Error running a cart command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),

    #[error("cart storage: {0}")]
    Store(#[from] StoreError),

    #[error("invalid product id {0}")]
    InvalidProductId(i32),

    #[error("{0}")]
    Rejected(String),
}

type Manager = CartManager<HttpCatalogClient, FileStore, NotificationQueue>;

/// A cart loaded from disk for the duration of one command.
pub struct CartSession {
    manager: Manager,
    notifications: NotificationQueue,
}

impl CartSession {
    /// Build the catalog client and load the cart saved under `storage_dir`.
    pub fn open(
        catalog_url: &str,
        api_token: Option<String>,
        storage_dir: &Path,
    ) -> Result<Self, CommandError> {
        let config = CatalogConfig::new(catalog_url, api_token)?;
        let catalog = HttpCatalogClient::new(&config)?;
        let store = FileStore::open(storage_dir)?;
        let notifications = NotificationQueue::new();

        tracing::debug!(
            catalog = catalog.base_url(),
            storage = %store.dir().display(),
            "Opened cart session"
        );

        Ok(Self {
            manager: CartManager::new(catalog, store, notifications.clone()),
            notifications,
        })
    }

    pub fn show(&self) -> Result<(), CommandError> {
        print_cart(self.manager.cart());
        Ok(())
    }

    pub async fn add(&mut self, product_id: i32) -> Result<(), CommandError> {
        let product_id = parse_id(product_id)?;
        print_cart(self.manager.add_product(product_id).await);
        self.finish()
    }

    pub fn remove(&mut self, product_id: i32) -> Result<(), CommandError> {
        let product_id = parse_id(product_id)?;
        print_cart(self.manager.remove_product(product_id));
        self.finish()
    }

    pub async fn update(&mut self, product_id: i32, amount: i64) -> Result<(), CommandError> {
        let product_id = parse_id(product_id)?;
        let cart = self
            .manager
            .update_product_amount(UpdateProductAmount { product_id, amount })
            .await;
        print_cart(cart);
        self.finish()
    }

    pub fn clear(&mut self) -> Result<(), CommandError> {
        print_cart(self.manager.clear());
        self.finish()
    }

    /// Turn notifications raised by the last operation into an error.
    fn finish(&self) -> Result<(), CommandError> {
        let messages = self.notifications.drain();
        if messages.is_empty() {
            return Ok(());
        }

        for message in &messages {
            tracing::warn!("{message}");
        }
        Err(CommandError::Rejected(messages.join("; ")))
    }
}

fn parse_id(raw: i32) -> Result<ProductId, CommandError> {
    let id = ProductId::new(raw);
    if id.is_valid() {
        Ok(id)
    } else {
        Err(CommandError::InvalidProductId(raw))
    }
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty.");
        return;
    }

    println!("{:<6} {:<40} {:>6} {:>12}", "ID", "Name", "Qty", "Total");
    println!("{}", "-".repeat(67));
    for product in cart {
        println!(
            "{:<6} {:<40} {:>6} {:>12}",
            product.id.to_string(),
            truncate(&product.name, 40),
            product.amount,
            product.line_total().to_string()
        );
    }
    println!("{}", "-".repeat(67));
    println!(
        "{:<6} {:<40} {:>6} {:>12}",
        "",
        "Subtotal",
        cart.total_items(),
        cart.subtotal().to_string()
    );
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
