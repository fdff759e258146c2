//! Cart operations against a live catalog over HTTP.
//!
//! These drive [`CartManager`] with the real reqwest-based catalog client,
//! so they cover the wire format as well as the cart rules.

#![allow(clippy::unwrap_used)]

use rocketshoes_core::{Cart, ProductId};
use rocketshoes_integration_tests::StubCatalog;
use rocketshoes_storefront::cart::{
    CART_STORAGE_KEY, CartError, CartManager, UpdateProductAmount,
};
use rocketshoes_storefront::catalog::{CatalogError, CatalogService, HttpCatalogClient};
use rocketshoes_storefront::notify::NotificationQueue;
use rocketshoes_storefront::store::{FileStore, MemoryStore, PersistentStore};
use rust_decimal::Decimal;

type Manager<S> = CartManager<HttpCatalogClient, S, NotificationQueue>;

fn manager(catalog: &StubCatalog) -> (Manager<MemoryStore>, NotificationQueue) {
    let queue = NotificationQueue::new();
    let manager = CartManager::new(catalog.client(), MemoryStore::new(), queue.clone());
    (manager, queue)
}

fn stored_cart<S: PersistentStore>(store: &S) -> Cart {
    let raw = store.get(CART_STORAGE_KEY).unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

// =============================================================================
// Catalog client
// =============================================================================

#[tokio::test]
async fn test_client_reads_stock_and_product() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Tênis de Caminhada", 17990, 5);
    let client = catalog.client();

    let stock = client.stock(ProductId::new(1)).await.unwrap();
    assert_eq!(stock.amount, 5);

    let product = client.product(ProductId::new(1)).await.unwrap();
    assert_eq!(product.name, "Tênis de Caminhada");
    assert_eq!(product.price, Decimal::new(17990, 2));
    assert_eq!(product.image_url, "https://cdn.rocketshoes.test/1.jpg");
}

#[tokio::test]
async fn test_client_maps_missing_and_failing_lookups() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Tênis", 1000, 1);
    catalog.break_stock(1);
    let client = catalog.client();

    assert!(matches!(
        client.product(ProductId::new(99)).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        client.stock(ProductId::new(1)).await,
        Err(CatalogError::Api { status: 500, .. })
    ));
}

// =============================================================================
// Adding
// =============================================================================

#[tokio::test]
async fn test_add_new_product_creates_single_unit_entry() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Shoe", 1000, 5);
    let (mut manager, queue) = manager(&catalog);

    manager.add_product(ProductId::new(1)).await;

    let cart = manager.cart();
    assert_eq!(cart.len(), 1);
    let entry = cart.get(ProductId::new(1)).unwrap();
    assert_eq!(entry.name, "Shoe");
    assert_eq!(entry.price, Decimal::new(10, 0));
    assert_eq!(entry.amount, 1);
    assert!(queue.drain().is_empty());
    assert_eq!(&stored_cart(manager.store()), manager.cart());
}

#[tokio::test]
async fn test_distinct_adds_each_hold_one_unit() {
    let catalog = StubCatalog::spawn().await;
    for id in 1..=4 {
        catalog.insert(id, &format!("Modelo {id}"), 9990, 3);
    }
    let (mut manager, queue) = manager(&catalog);

    for id in [3, 1, 4, 2] {
        manager.add_product(ProductId::new(id)).await;
    }

    let ids: Vec<i32> = manager.cart().iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![3, 1, 4, 2]);
    assert!(manager.cart().iter().all(|p| p.amount == 1));
    assert!(queue.drain().is_empty());
}

#[tokio::test]
async fn test_second_add_respects_stock() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Shoe", 1000, 1);
    let (mut manager, queue) = manager(&catalog);

    manager.add_product(ProductId::new(1)).await;
    let before = manager.cart().clone();
    manager.add_product(ProductId::new(1)).await;

    assert_eq!(manager.cart(), &before);
    assert_eq!(queue.drain(), vec!["Quantidade solicitada fora de estoque"]);

    catalog.set_stock(1, 2);
    manager.add_product(ProductId::new(1)).await;
    assert_eq!(manager.cart().get(ProductId::new(1)).unwrap().amount, 2);
    assert!(queue.drain().is_empty());
}

#[tokio::test]
async fn test_add_unknown_product_notifies_and_keeps_cart() {
    let catalog = StubCatalog::spawn().await;
    let (mut manager, queue) = manager(&catalog);

    let err = manager.try_add_product(ProductId::new(7)).await.unwrap_err();
    assert!(matches!(
        err,
        CartError::AdditionFailed(CatalogError::NotFound(_))
    ));

    manager.add_product(ProductId::new(7)).await;
    assert!(manager.cart().is_empty());
    assert_eq!(queue.drain(), vec!["Erro na adição do produto"]);
    assert!(manager.store().get(CART_STORAGE_KEY).unwrap().is_none());
}

// =============================================================================
// Removing and updating
// =============================================================================

#[tokio::test]
async fn test_remove_keeps_order_of_remaining_entries() {
    let catalog = StubCatalog::spawn().await;
    for id in 1..=3 {
        catalog.insert(id, &format!("Modelo {id}"), 5000, 2);
    }
    let (mut manager, queue) = manager(&catalog);
    for id in 1..=3 {
        manager.add_product(ProductId::new(id)).await;
    }

    manager.remove_product(ProductId::new(2));
    let ids: Vec<i32> = manager.cart().iter().map(|p| p.id.as_i32()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(&stored_cart(manager.store()), manager.cart());

    manager.remove_product(ProductId::new(2));
    assert_eq!(manager.cart().len(), 2);
    assert_eq!(queue.drain(), vec!["Erro na remoção do produto"]);
}

#[tokio::test]
async fn test_update_amount_within_stock() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Shoe", 1000, 5);
    let saved = r#"[{"id":1,"name":"Shoe","price":10,"imageUrl":"x","amount":3}]"#;
    let queue = NotificationQueue::new();
    let mut manager = CartManager::new(
        catalog.client(),
        MemoryStore::with_entry(CART_STORAGE_KEY, saved),
        queue.clone(),
    );

    manager
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 2,
        })
        .await;

    assert_eq!(manager.cart().get(ProductId::new(1)).unwrap().amount, 2);
    assert!(queue.drain().is_empty());
    assert_eq!(&stored_cart(manager.store()), manager.cart());
}

#[tokio::test]
async fn test_update_amount_rejections() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Shoe", 1000, 2);
    catalog.insert(2, "Boot", 2500, 4);
    let (mut manager, queue) = manager(&catalog);
    manager.add_product(ProductId::new(1)).await;
    manager.add_product(ProductId::new(2)).await;
    let before = manager.cart().clone();

    // Zero and negative amounts are ignored without a notification.
    for amount in [0, -3] {
        manager
            .update_product_amount(UpdateProductAmount {
                product_id: ProductId::new(1),
                amount,
            })
            .await;
    }
    assert_eq!(manager.cart(), &before);
    assert!(queue.drain().is_empty());

    manager
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(1),
            amount: 3,
        })
        .await;
    assert_eq!(manager.cart(), &before);
    assert_eq!(queue.drain(), vec!["Quantidade solicitada fora de estoque"]);

    catalog.break_stock(2);
    manager
        .update_product_amount(UpdateProductAmount {
            product_id: ProductId::new(2),
            amount: 2,
        })
        .await;
    assert_eq!(manager.cart(), &before);
    assert_eq!(
        queue.drain(),
        vec!["Erro na alteração de quantidade do produto"]
    );
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart_on_disk() {
    let catalog = StubCatalog::spawn().await;
    catalog.insert(1, "Shoe", 1000, 5);
    catalog.insert(2, "Boot", 2500, 5);
    let dir = tempfile::tempdir().unwrap();

    let expected = {
        let mut manager = CartManager::new(
            catalog.client(),
            FileStore::open(dir.path()).unwrap(),
            NotificationQueue::new(),
        );
        manager.add_product(ProductId::new(1)).await;
        manager.add_product(ProductId::new(2)).await;
        manager.add_product(ProductId::new(2)).await;
        manager.cart().clone()
    };

    let reopened = CartManager::new(
        catalog.client(),
        FileStore::open(dir.path()).unwrap(),
        NotificationQueue::new(),
    );
    assert_eq!(reopened.cart(), &expected);
    assert_eq!(reopened.cart().total_items(), 3);
    assert_eq!(reopened.cart().subtotal(), Decimal::new(6000, 2));
}
