//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types used across all RocketShoes components:
//! - `storefront` - Cart manager, catalog client, persistence and JSON API
//! - `cli` - Command-line front end for a local cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. Every cart transition returns a new
//! [`Cart`] value instead of mutating entries in place, so callers decide
//! when (and whether) to commit it.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, catalog records and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
