//! `ishop checkout`.

use ishop_storefront::{AppState, CheckoutOutcome, Result};
use tracing::{info, warn};

use super::price;

pub async fn run(state: &mut AppState) -> Result<()> {
    state.restore_session().await;

    match state.checkout().await? {
        CheckoutOutcome::LoginRequired => warn!("Sign in first: ishop login -u <username>"),
        CheckoutOutcome::EmptyCart => info!("Cart is empty, nothing to order"),
        CheckoutOutcome::Placed(receipt) => info!(
            "Order #{} placed, total {} ({})",
            receipt.id,
            price(receipt.total, false),
            receipt.status_fa()
        ),
    }
    Ok(())
}
