//! HTTP client implementation.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use ishop_core::{OrderRequest, ProductId};
use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    Banner, LoginRequest, LoginResponse, OrderReceipt, Product, RegisterBody, RegisterRequest,
    TokenResponse, User,
};
use crate::config::StorefrontConfig;

/// Number of results the storefront search box asks for.
pub const DEFAULT_SEARCH_LIMIT: u32 = 6;

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_CAPACITY: u64 = 1000;
const ERROR_BODY_LIMIT: usize = 200;
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the iShop REST API.
///
/// Cheap to clone; clones share the connection pool, the bearer token and
/// the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
    cache: Cache<CacheKey, CacheValue>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url`, e.g. `https://ishop.ir/api/v1`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if `base_url` does not parse, or
    /// `ApiError::Http` if the TLS backend cannot be initialized.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                token: RwLock::new(None),
                cache,
            }),
        })
    }

    /// Create a client from the storefront configuration.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_url(), config.http_timeout)
    }

    /// Base URL every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // Token
    // =========================================================================

    /// Use `token` as the bearer credential for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Forget the bearer credential.
    pub fn clear_token(&self) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a bearer credential is held.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn token(&self) -> Option<SecretString> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // =========================================================================
    // Transport
    // =========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the bearer token, send, and decode a JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = match self.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED {
            self.clear_token();
            return Err(ApiError::Unauthorized);
        }

        let path = response.url().path().to_string();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path));
        }

        if !status.is_success() {
            if status.is_server_error() {
                tracing::error!(
                    status = %status,
                    path = %path,
                    body = %truncate(&body, LOG_BODY_LIMIT),
                    "API returned server error"
                );
            } else {
                tracing::warn!(
                    status = %status,
                    path = %path,
                    body = %truncate(&body, LOG_BODY_LIMIT),
                    "API rejected request"
                );
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                body = %truncate(&body, LOG_BODY_LIMIT),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.inner.client.get(self.url(path))).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List all active products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get("/products").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or another
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get(&format!("/products/{id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search products by name. Results are never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str, limit: u32) -> Result<Vec<Product>, ApiError> {
        let path = format!(
            "/products?query={}&limit={limit}",
            urlencoding::encode(query.trim())
        );
        self.get(&path).await
    }

    /// List homepage banners.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Vec<Banner>, ApiError> {
        if let Some(CacheValue::Banners(banners)) = self.inner.cache.get(&CacheKey::Banners).await
        {
            debug!("Cache hit for banners");
            return Ok(banners);
        }

        let banners: Vec<Banner> = self.get("/banners").await?;

        self.inner
            .cache
            .insert(CacheKey::Banners, CacheValue::Banners(banners.clone()))
            .await;

        Ok(banners)
    }

    /// Get the banner in slot `key`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the slot is empty, or another error if
    /// the API request fails.
    #[instrument(skip(self))]
    pub async fn banner(&self, key: &str) -> Result<Banner, ApiError> {
        let cache_key = CacheKey::Banner(key.to_string());

        if let Some(CacheValue::Banner(banner)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for banner");
            return Ok(*banner);
        }

        let banner: Banner = self
            .get(&format!("/banners/{}", urlencoding::encode(key)))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Banner(Box::new(banner.clone())))
            .await;

        Ok(banner)
    }

    /// Drop every cached catalog response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Backend health report, returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<serde_json::Value, ApiError> {
        self.get("/health").await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a bearer token. On success the token is held
    /// by this client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` or `ApiError::Status` when the
    /// backend rejects the credentials, or another error if the request fails.
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let form = [
            ("username", request.identifier.as_str()),
            ("password", request.password.expose_secret()),
        ];
        let raw: TokenResponse = self
            .send(self.inner.client.post(self.url("/auth/login")).form(&form))
            .await?;

        let response = LoginResponse::from(raw);
        self.set_token(response.access_token.clone());
        debug!("Login succeeded");
        Ok(response)
    }

    /// Create an account. On success the issued token is held by this client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` when the backend rejects the form (for
    /// example a taken username), or another error if the request fails.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginResponse, ApiError> {
        let body = RegisterBody {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email_or_phone: &request.email_or_phone,
            password: request.password.expose_secret(),
            username: &request.username,
        };
        let raw: TokenResponse = self
            .send(self.inner.client.post(self.url("/auth/register")).json(&body))
            .await?;

        let response = LoginResponse::from(raw);
        self.set_token(response.access_token.clone());
        debug!("Registration succeeded");
        Ok(response)
    }

    /// The account the held token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if no valid token is held.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/user").await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails; nothing is retried.
    #[instrument(skip_all, fields(items = order.items.len(), total = %order.total))]
    pub async fn create_order(&self, order: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        self.send(self.inner.client.post(self.url("/orders")).json(order))
            .await
    }

    /// Orders placed by the signed-in user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if no valid token is held.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<OrderReceipt>, ApiError> {
        self.get("/orders").await
    }
}

/// First `limit` characters of `body`.
fn truncate(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9/api/v1/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = client();
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api/v1");
        assert_eq!(client.url("/products"), "http://127.0.0.1:9/api/v1/products");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new("/api/v1", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_token_lifecycle_shared_between_clones() {
        let client = client();
        let clone = client.clone();
        assert!(!client.has_token());

        client.set_token(SecretString::from("tok"));
        assert!(clone.has_token());

        clone.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client();
        client.set_token(SecretString::from("very-secret-token"));
        let debug = format!("{client:?}");
        assert!(debug.contains("has_token: true"));
        assert!(!debug.contains("very-secret-token"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("سلام دنیا", 4), "سلام");
        assert_eq!(truncate("ok", 10), "ok");
    }
}
