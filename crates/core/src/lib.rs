//! iShop Core - Shared types, cart store and locale utilities.
//!
//! This crate provides the pieces of the iShop storefront that do not talk to
//! the network. It is used by:
//! - `storefront` - REST client, file-backed storage, checkout
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains types, the cart state machine and the persistence
//! contract. It does no file or network I/O of its own; durable storage is
//! reached through the [`storage::KeyValueStore`] trait, which the storefront
//! crate implements over the filesystem.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities and Iranian identifiers
//! - [`cart`] - The cart store and its persistence bridge
//! - [`storage`] - Key-value storage abstraction with an in-memory implementation
//! - [`locale`] - Persian digits, Toman formatting and the Jalali calendar

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod locale;
pub mod storage;
pub mod types;

pub use cart::{
    CartPersistence, CartState, CartStore, KeyValueCartPersistence, LineItem, NewLineItem,
    OrderLine, OrderRequest,
};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use types::*;
