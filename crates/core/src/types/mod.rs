//! Core types for RocketShoes.

pub mod cart;
pub mod id;
pub mod product;

pub use cart::{Cart, CartRuleViolation};
pub use id::*;
pub use product::{CatalogProduct, Product, Stock};
