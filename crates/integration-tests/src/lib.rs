//! Integration tests for RocketShoes.
//!
//! The tests in `tests/` run the real HTTP catalog client and the storefront
//! router against [`StubCatalog`], an in-process axum server that answers
//! `GET /stock/{id}` and `GET /products/{id}` from an in-memory table.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use rocketshoes_core::{CatalogProduct, ProductId, Stock};
use rocketshoes_storefront::catalog::HttpCatalogClient;
use rocketshoes_storefront::config::CatalogConfig;
use rust_decimal::Decimal;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Table {
    products: HashMap<i32, CatalogProduct>,
    stock: HashMap<i32, u32>,
    broken_stock: HashSet<i32>,
}

type Shared = Arc<Mutex<Table>>;

fn lock(table: &Shared) -> std::sync::MutexGuard<'_, Table> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A catalog service listening on an ephemeral local port.
///
/// The server task is aborted when the stub is dropped.
pub struct StubCatalog {
    addr: SocketAddr,
    table: Shared,
    server: JoinHandle<()>,
}

impl StubCatalog {
    /// Bind to `127.0.0.1:0` and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::expect_used)]
    pub async fn spawn() -> Self {
        let table = Shared::default();
        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&table));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub catalog");
        let addr = listener.local_addr().expect("stub catalog address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            table,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client pointed at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client(&self) -> HttpCatalogClient {
        let config =
            CatalogConfig::new(&self.base_url(), None).expect("stub catalog config");
        HttpCatalogClient::new(&config).expect("stub catalog client")
    }

    /// Register a product priced in cents with `amount` units in stock.
    pub fn insert(&self, id: i32, name: &str, price_cents: i64, amount: u32) {
        let mut table = lock(&self.table);
        table.products.insert(
            id,
            CatalogProduct {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Decimal::new(price_cents, 2),
                image_url: format!("https://cdn.rocketshoes.test/{id}.jpg"),
            },
        );
        table.stock.insert(id, amount);
    }

    pub fn set_stock(&self, id: i32, amount: u32) {
        lock(&self.table).stock.insert(id, amount);
    }

    /// Make `GET /stock/{id}` answer `500`.
    pub fn break_stock(&self, id: i32) {
        lock(&self.table).broken_stock.insert(id);
    }
}

impl Drop for StubCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn stock(State(table): State<Shared>, Path(id): Path<i32>) -> Response {
    let table = lock(&table);
    if table.broken_stock.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "stock backend down").into_response();
    }
    match table.stock.get(&id) {
        Some(&amount) => Json(Stock {
            id: ProductId::new(id),
            amount,
        })
        .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(State(table): State<Shared>, Path(id): Path<i32>) -> Response {
    match lock(&table).products.get(&id) {
        Some(product) => Json(product.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
