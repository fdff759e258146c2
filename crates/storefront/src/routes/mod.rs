//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Health check
//!
//! # Cart (JSON)
//! GET    /cart                 - Current cart
//! DELETE /cart                 - Empty the cart
//! POST   /cart/items           - Add one unit    { "productId": 1 }
//! PUT    /cart/items/{id}      - Set quantity    { "amount": 2 }
//! DELETE /cart/items/{id}      - Remove product
//! ```

pub mod cart;

use axum::{
    Router,
    http::Uri,
    routing::{get, post, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add))
        .route("/cart/items/{id}", put(cart::update).delete(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(cart_routes())
        .fallback(not_found)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
