//! Wire types for the iShop REST API.

use chrono::NaiveDateTime;
use ishop_core::{BannerId, NewLineItem, OrderId, OrderStatus, Price, ProductId, UserId, UserRole};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "IRT".to_string()
}

const fn default_true() -> bool {
    true
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A catalog product. Prices are in Toman.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Price,
    /// Backend currency code, `IRT` unless stated otherwise.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub slug: String,
    /// Units on hand.
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Product {
    /// True when the product is active and has stock.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.is_active && self.stock > 0
    }
}

impl From<&Product> for NewLineItem {
    fn from(product: &Product) -> Self {
        let item = Self::new(product.id, product.name.clone(), product.price);
        match &product.image_url {
            Some(url) => item.with_image(url.clone()),
            None => item,
        }
    }
}

/// A homepage banner slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    /// Slot key, e.g. `hero` or `side-1`.
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    pub price: Price,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub position: i32,
    /// Last edit in the backend's local time.
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

// =============================================================================
// Auth Types
// =============================================================================

/// A signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub username: String,
    /// Only sent by backends that expose roles to customers.
    #[serde(default)]
    pub role: Option<UserRole>,
}

impl User {
    /// First and last name, or the username when both are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Username, email or mobile number.
    pub identifier: String,
    pub password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Sign-up form for `POST /auth/register`.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    /// Email address or Iranian mobile number.
    pub email_or_phone: String,
    pub password: SecretString,
    pub username: String,
}

/// JSON body of a registration; only lives for the duration of the request.
#[derive(Serialize)]
pub(super) struct RegisterBody<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email_or_phone: &'a str,
    pub password: &'a str,
    pub username: &'a str,
}

/// Token issued by login and registration.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub access_token: SecretString,
    pub token_type: String,
}

#[derive(Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl From<TokenResponse> for LoginResponse {
    fn from(raw: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(raw.access_token),
            token_type: raw.token_type,
        }
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// The backend's answer to a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
}

impl OrderReceipt {
    /// Persian label for the order status.
    #[must_use]
    pub const fn status_fa(&self) -> &'static str {
        self.status.label_fa()
    }
}
