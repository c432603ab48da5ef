//! Catalog browsing: products, banners and the health check.

use ishop_core::ProductId;
use ishop_storefront::api::Product;
use ishop_storefront::{AppState, Result};
use tracing::info;

use super::price;

fn print_product(product: &Product, fa: bool) {
    let availability = if product.is_available() {
        ""
    } else {
        " (unavailable)"
    };
    info!(
        "#{} {} - {}{availability}",
        product.id,
        product.name,
        price(product.price, fa)
    );
}

pub async fn list(state: &AppState, fa: bool) -> Result<()> {
    let products = state.api().products().await?;
    if products.is_empty() {
        info!("No products");
    }
    for product in &products {
        print_product(product, fa);
    }
    Ok(())
}

pub async fn search(state: &AppState, query: &str, limit: u32, fa: bool) -> Result<()> {
    let products = state.api().search_products(query, limit).await?;
    if products.is_empty() {
        info!("No products match \"{query}\"");
    }
    for product in &products {
        print_product(product, fa);
    }
    Ok(())
}

pub async fn show(state: &AppState, product_id: i64, fa: bool) -> Result<()> {
    let product = state.api().product(ProductId::new(product_id)).await?;

    print_product(&product, fa);
    if let Some(category) = &product.category {
        info!("Category: {category}");
    }
    if let Some(description) = product.description.as_deref().filter(|d| !d.is_empty()) {
        info!("{description}");
    }
    info!("In stock: {}", product.stock.max(0));
    Ok(())
}

/// Active banners in slot order.
pub async fn banners(state: &AppState) -> Result<()> {
    let mut banners = state.api().banners().await?;
    banners.retain(|b| b.active);
    banners.sort_by_key(|b| b.position);

    for banner in &banners {
        info!(
            "[{}] {} - {}",
            banner.key,
            banner.title.as_deref().unwrap_or("-"),
            price(banner.price, false)
        );
    }
    Ok(())
}

pub async fn health(state: &AppState) -> Result<()> {
    let report = state.api().health().await?;
    info!("Backend at {} is up: {report}", state.api().base_url());
    Ok(())
}
