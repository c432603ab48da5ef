//! Turning the cart into an order.

use ishop_core::{CartPersistence, CartStore};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, OrderReceipt, User};
use crate::error::add_breadcrumb;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The backend did not accept the order. The cart is unchanged.
    #[error("order submission failed: {0}")]
    Api(#[from] ApiError),
}

/// What happened to a checkout attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nobody is signed in; the cart was closed and nothing was sent.
    LoginRequired,
    /// The cart has no items; nothing was sent.
    EmptyCart,
    /// The order was accepted and the cart cleared.
    Placed(OrderReceipt),
}

/// Submit the cart as an order for `user`.
///
/// The cart is cleared only after the backend accepts the order.
///
/// # Errors
///
/// Returns `CheckoutError::Api` if the order request fails; the cart keeps
/// its items.
#[instrument(skip_all, fields(items = cart.len()))]
pub async fn submit_order<P: CartPersistence>(
    cart: &mut CartStore<P>,
    api: &ApiClient,
    user: Option<&User>,
) -> Result<CheckoutOutcome, CheckoutError> {
    let Some(user) = user else {
        cart.close();
        info!("Checkout requires sign-in");
        return Ok(CheckoutOutcome::LoginRequired);
    };

    if cart.is_empty() {
        return Ok(CheckoutOutcome::EmptyCart);
    }

    let order = cart.order_request();
    let item_count = order.items.len().to_string();
    add_breadcrumb(
        "checkout",
        "Submitting order",
        Some(&[("items", item_count.as_str())]),
    );

    let receipt = match api.create_order(&order).await {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(error = %e, user_id = %user.id, "Order submission failed, cart kept");
            return Err(e.into());
        }
    };

    cart.clear();
    info!(
        order_id = %receipt.id,
        user_id = %user.id,
        total = %receipt.total,
        "Order placed"
    );

    Ok(CheckoutOutcome::Placed(receipt))
}
