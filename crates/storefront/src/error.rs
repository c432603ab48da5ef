//! Unified error handling with Sentry integration.
//!
//! Provides a unified `StorefrontError` that front ends (the CLI) return from
//! their command handlers. [`StorefrontError::report`] captures server-class
//! failures to Sentry before they are shown to the user.

use ishop_core::StorageError;
use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order submission failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Local storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// True for failures the user cannot fix by changing their input.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Api(err) | Self::Auth(AuthError::Api(err)) => err.is_server_error(),
            Self::Checkout(CheckoutError::Api(err)) => err.is_server_error(),
            Self::Storage(_) => true,
            _ => false,
        }
    }

    /// Log the error, capturing server-class failures to Sentry.
    pub fn report(&self) {
        if self.is_server_error() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Command failed"
            );
        } else {
            tracing::warn!(error = %self, "Command failed");
        }
    }

    /// Message suitable for showing to the user. Internal details of
    /// server-class failures are not included.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::RateLimited(secs))
            | Self::Checkout(CheckoutError::Api(ApiError::RateLimited(secs))) => {
                format!("Too many requests, try again in {secs}s")
            }
            Self::Api(ApiError::Unauthorized)
            | Self::Checkout(CheckoutError::Api(ApiError::Unauthorized)) => {
                "Please sign in again".to_string()
            }
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            _ if self.is_server_error() => "The shop is not reachable right now".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::Api(ApiError::NotFound("/products/123".to_string()));
        assert_eq!(err.to_string(), "API error: Not found: /products/123");
        assert!(!err.is_server_error());

        let err = StorefrontError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_server_error_classification() {
        let server = StorefrontError::Api(ApiError::Status {
            status: 500,
            body: "trace".to_string(),
        });
        assert!(server.is_server_error());
        assert_eq!(server.user_message(), "The shop is not reachable right now");

        let checkout = StorefrontError::Checkout(CheckoutError::Api(ApiError::Status {
            status: 502,
            body: String::new(),
        }));
        assert!(checkout.is_server_error());

        let auth = StorefrontError::Auth(AuthError::InvalidCredentials);
        assert!(!auth.is_server_error());
        assert_eq!(auth.user_message(), "Invalid credentials");
    }

    #[test]
    fn test_rate_limit_message() {
        let err = StorefrontError::Api(ApiError::RateLimited(4));
        assert_eq!(err.user_message(), "Too many requests, try again in 4s");
    }
}
