//! RocketShoes Storefront library.
//!
//! This crate provides the cart as a library, allowing it to be tested and
//! reused by the server binary and the CLI.
//!
//! # Modules
//!
//! - [`cart`] - `CartManager`, the only component that changes the cart
//! - [`catalog`] - Stock and product lookups (`CatalogService`, HTTP client)
//! - [`store`] - Key-value persistence (`PersistentStore`, memory and file stores)
//! - [`notify`] - Where user-facing error messages go
//! - [`routes`] - JSON API over the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;
pub mod store;
