//! Sign-in, sign-up and order history.

use ishop_storefront::api::{ApiError, RegisterRequest};
use ishop_storefront::{AppState, Result, StorefrontError};
use secrecy::SecretString;
use tracing::info;

use super::{number, price};

/// Arguments of `ishop register`.
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub contact: String,
    pub username: String,
    pub password: String,
}

pub async fn login(state: &mut AppState, username: &str, password: &str) -> Result<()> {
    let user = state.auth_mut().login(username, password).await?;
    info!("Signed in as {}", user.display_name());
    Ok(())
}

pub async fn register(state: &mut AppState, form: RegisterForm) -> Result<()> {
    let request = RegisterRequest {
        first_name: form.first_name,
        last_name: form.last_name,
        email_or_phone: form.contact,
        password: SecretString::from(form.password),
        username: form.username,
    };
    let user = state.auth_mut().register(request).await?;
    info!("Welcome, {}", user.display_name());
    Ok(())
}

pub fn logout(state: &mut AppState) {
    state.auth_mut().logout();
    info!("Signed out");
}

pub async fn whoami(state: &mut AppState) -> Result<()> {
    match state.restore_session().await {
        Some(user) => info!(
            "{} (@{}) {} {}",
            user.display_name(),
            user.username,
            user.email,
            user.role.map_or("", |role| role.label_fa())
        ),
        None => info!("Not signed in"),
    }
    Ok(())
}

pub async fn orders(state: &mut AppState, fa: bool) -> Result<()> {
    if state.restore_session().await.is_none() {
        return Err(StorefrontError::Api(ApiError::Unauthorized));
    }

    let orders = state.api().orders().await?;
    if orders.is_empty() {
        info!("No orders yet");
    }
    for order in &orders {
        let status = if fa {
            order.status_fa()
        } else {
            order.status.as_str()
        };
        info!(
            "Order #{} {} {status}",
            number(order.id, fa),
            price(order.total, fa)
        );
    }
    Ok(())
}
