//! iShop storefront client library.
//!
//! Connects the cart from `ishop-core` to the outside world: the REST API,
//! a file-backed store for the cart and auth token, sign-in and checkout.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use auth::{AUTH_TOKEN_KEY, AuthError, AuthSession};
pub use checkout::{CheckoutError, CheckoutOutcome, submit_order};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{Result, StorefrontError};
pub use state::{AppState, FileCart};
pub use storage::FileStore;
