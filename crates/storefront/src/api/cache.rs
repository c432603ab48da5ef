//! Cache types for catalog responses.

use ishop_core::ProductId;

use super::types::{Banner, Product};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Banners,
    Banner(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Banners(Vec<Banner>),
    Banner(Box<Banner>),
}
