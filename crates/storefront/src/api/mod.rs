//! Client for the iShop REST API.
//!
//! # Architecture
//!
//! - JSON over HTTP with `reqwest`; bearer token when signed in
//! - Catalog reads (products, banners) cached in-process via `moka` (5 minute TTL)
//! - Orders and auth calls always go to the network
//! - No retries; callers decide what to do with a failure
//!
//! # Example
//!
//! ```rust,ignore
//! use ishop_storefront::api::ApiClient;
//!
//! let client = ApiClient::from_config(&config)?;
//!
//! let products = client.products().await?;
//! let receipt = client.create_order(&cart.order_request()).await?;
//! ```

mod cache;
mod client;
pub mod types;

pub use client::{ApiClient, DEFAULT_SEARCH_LIMIT};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the bearer token (or none was sent).
    #[error("Authentication required")]
    Unauthorized,

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The configured base URL cannot be used.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// True for failures on the backend's side or in transit, as opposed to
    /// a problem with the request or the caller's credentials.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code carried by the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            Self::Unauthorized => Some(401),
            Self::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_classification() {
        let err = ApiError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.is_server_error());
        assert_eq!(err.status(), Some(502));

        let err = ApiError::Status {
            status: 400,
            body: String::new(),
        };
        assert!(!err.is_server_error());
        assert!(!ApiError::Unauthorized.is_server_error());
        assert!(!ApiError::RateLimited(3).is_server_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::RateLimited(2).to_string(),
            "Rate limited, retry after 2 seconds"
        );
        assert_eq!(
            ApiError::Status {
                status: 500,
                body: "boom".to_string()
            }
            .to_string(),
            "HTTP 500: boom"
        );
    }
}
