//! Cart route handlers.
//!
//! Every handler answers with the cart as it stands after the operation,
//! plus any notifications the operation raised. A rejected cart change is
//! still a `200 OK`: the UI shows the notification and re-renders.

use axum::{
    Json,
    extract::{Path, State},
};
use rocketshoes_core::{Cart, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cart::UpdateProductAmount;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: Cart,
    pub total_items: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Messages to show the shopper, oldest first.
    pub notifications: Vec<String>,
}

impl CartResponse {
    #[must_use]
    pub fn new(cart: &Cart, notifications: Vec<String>) -> Self {
        Self {
            cart: cart.clone(),
            total_items: cart.total_items(),
            subtotal: cart.subtotal(),
            notifications,
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update amount request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

fn require_valid(product_id: ProductId) -> Result<ProductId> {
    if product_id.is_valid() {
        Ok(product_id)
    } else {
        Err(AppError::BadRequest(format!("invalid product id {product_id}")))
    }
}

/// Show the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<CartResponse> {
    let manager = state.cart().await;
    Json(CartResponse::new(
        manager.cart(),
        state.notifications().drain(),
    ))
}

/// Add one unit of a product.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = require_valid(body.product_id)?;
    add_breadcrumb("cart", "Add product", &[("product_id", product_id.to_string())]);

    let mut manager = state.cart().await;
    let cart = manager.add_product(product_id).await;
    Ok(Json(CartResponse::new(cart, state.notifications().drain())))
}

/// Remove a product.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartResponse>> {
    let product_id = require_valid(product_id)?;
    add_breadcrumb("cart", "Remove product", &[("product_id", product_id.to_string())]);

    let mut manager = state.cart().await;
    let cart = manager.remove_product(product_id);
    Ok(Json(CartResponse::new(cart, state.notifications().drain())))
}

/// Set a product's quantity.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(body): Json<UpdateAmountRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = require_valid(product_id)?;
    add_breadcrumb(
        "cart",
        "Update amount",
        &[
            ("product_id", product_id.to_string()),
            ("amount", body.amount.to_string()),
        ],
    );

    let mut manager = state.cart().await;
    let cart = manager
        .update_product_amount(UpdateProductAmount {
            product_id,
            amount: body.amount,
        })
        .await;
    Ok(Json(CartResponse::new(cart, state.notifications().drain())))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Json<CartResponse> {
    add_breadcrumb("cart", "Clear cart", &[]);

    let mut manager = state.cart().await;
    let cart = manager.clear();
    Json(CartResponse::new(cart, state.notifications().drain()))
}
