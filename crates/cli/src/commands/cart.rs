//! `ishop cart` subcommands.

use ishop_core::ProductId;
use ishop_storefront::{AppState, Result};
use tracing::{info, warn};

use super::{number, price};

/// Print every line and the subtotal.
pub fn show(state: &AppState, fa: bool) {
    let cart = state.cart();
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }

    for item in cart.items() {
        info!(
            "#{} {} × {} = {}",
            item.id,
            item.name,
            number(item.quantity, fa),
            price(item.line_total(), fa)
        );
    }
    info!(
        "{} items, subtotal {}",
        number(cart.total_item_count(), fa),
        price(cart.subtotal(), fa)
    );
}

/// Fetch a product and add one unit of it.
pub async fn add(state: &mut AppState, product_id: i64) -> Result<()> {
    let (product, quantity) = state.add_product(ProductId::new(product_id)).await?;
    info!("Added {} (quantity {quantity})", product.name);
    Ok(())
}

pub fn remove(state: &mut AppState, product_id: i64) {
    match state.cart_mut().remove_item(ProductId::new(product_id)) {
        Some(item) => info!("Removed {}", item.name),
        None => warn!(product_id, "Product is not in the cart"),
    }
}

pub fn set(state: &mut AppState, product_id: i64, quantity: i64) {
    match state
        .cart_mut()
        .set_quantity(ProductId::new(product_id), quantity)
    {
        Some(quantity) => info!("Quantity of #{product_id} is now {quantity}"),
        None => warn!(product_id, "Product is not in the cart"),
    }
}

pub fn clear(state: &mut AppState) {
    state.cart_mut().clear();
    info!("Cart cleared");
}
