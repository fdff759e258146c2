//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::cart::CartManager;
use crate::catalog::{CatalogError, HttpCatalogClient};
use crate::config::StorefrontConfig;
use crate::notify::NotificationQueue;
use crate::store::{FileStore, StoreError};

/// The cart manager as wired up by the server.
pub type StorefrontCart = CartManager<HttpCatalogClient, FileStore, NotificationQueue>;

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("catalog client: {0}")]
    Catalog(#[from] CatalogError),
    #[error("cart storage: {0}")]
    Store(#[from] StoreError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The cart sits behind an async
/// mutex so requests operate on it one at a time.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cart: Mutex<StorefrontCart>,
    notifications: NotificationQueue,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog client cannot be built or the storage
    /// directory cannot be created.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StateError> {
        let catalog = HttpCatalogClient::new(&config.catalog)?;
        let store = FileStore::open(&config.storage_dir)?;

        Ok(Self::from_manager(CartManager::new(
            catalog,
            store,
            NotificationQueue::new(),
        )))
    }

    /// Wrap an already-built cart manager.
    #[must_use]
    pub fn from_manager(manager: StorefrontCart) -> Self {
        let notifications = manager.notifier().clone();

        Self {
            inner: Arc::new(AppStateInner {
                cart: Mutex::new(manager),
                notifications,
            }),
        }
    }

    /// Lock the cart for one operation.
    pub async fn cart(&self) -> MutexGuard<'_, StorefrontCart> {
        self.inner.cart.lock().await
    }

    /// Queue of notifications raised by cart operations.
    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.inner.notifications
    }
}
