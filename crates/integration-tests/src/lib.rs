//! Integration tests for iShop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ishop-integration-tests
//! ```
//!
//! The tests need no external services: [`FakeBackend`] serves the parts of
//! the REST API the storefront uses from an in-process `axum` router bound
//! to an ephemeral port on `127.0.0.1`.
//!
//! # Test Categories
//!
//! - `api_client` - Catalog, auth and error mapping of `ApiClient`
//! - `checkout_flow` - Cart persistence, sign-in and order submission end to end

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Form, Path as UrlPath, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ishop_storefront::{ApiClient, ApiError, ConfigError, StorefrontConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Username accepted by the fake `/auth/login`.
pub const VALID_USERNAME: &str = "ali";
/// Password accepted by the fake `/auth/login`.
pub const VALID_PASSWORD: &str = "correct-horse";
/// Username the fake `/auth/register` reports as taken.
pub const TAKEN_USERNAME: &str = "taken";

const LOGIN_TOKEN: &str = "token-ali";
const REGISTER_TOKEN: &str = "token-new";

type Params = HashMap<String, String>;

// =============================================================================
// FakeBackend
// =============================================================================

/// An in-process stand-in for the iShop backend.
///
/// The server task is aborted when the value is dropped.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    server: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct BackendState {
    products: Vec<Value>,
    banners: Vec<Value>,
    orders: Mutex<Vec<Value>>,
    order_failure: Mutex<Option<u16>>,
    user_lookup_failing: AtomicBool,
    product_requests: AtomicUsize,
    product_queries: Mutex<Vec<Params>>,
    login_forms: Mutex<Vec<Params>>,
    registrations: Mutex<Vec<Value>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeBackend {
    /// Start a backend serving [`default_products`] and [`default_banners`].
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> io::Result<Self> {
        Self::with_catalog(default_products(), default_banners()).await
    }

    /// Start a backend serving the given catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn with_catalog(products: Vec<Value>, banners: Vec<Value>) -> io::Result<Self> {
        let state = Arc::new(BackendState {
            products,
            banners,
            ..BackendState::default()
        });

        let api = Router::new()
            .route("/health", get(health))
            .route("/products", get(list_products))
            .route("/products/{id}", get(get_product))
            .route("/banners", get(list_banners))
            .route("/banners/{key}", get(get_banner))
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/user", get(current_user))
            .route("/orders", get(list_orders).post(create_order))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api/v1", api);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            server,
        })
    }

    /// `http://127.0.0.1:<port>`.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL of the REST API.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.origin())
    }

    /// A fresh client pointed at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn api(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(&self.api_url(), Duration::from_secs(5))
    }

    /// Storefront configuration pointed at this backend, storing state in
    /// `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin is rejected.
    pub fn config(&self, data_dir: &Path) -> Result<StorefrontConfig, ConfigError> {
        let mut config = StorefrontConfig::for_origin(&self.origin())?;
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    /// Answer every order submission with `status`.
    pub fn fail_orders_with(&self, status: u16) {
        *lock(&self.state.order_failure) = Some(status);
    }

    /// Make `/auth/user` answer 500 until further notice. Login and
    /// registration still hand out tokens.
    pub fn fail_user_lookup(&self, failing: bool) {
        self.state.user_lookup_failing.store(failing, Ordering::SeqCst);
    }

    /// Accept order submissions again.
    pub fn accept_orders(&self) {
        *lock(&self.state.order_failure) = None;
    }

    /// Bodies of accepted orders, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state.orders).clone()
    }

    /// Number of product list and detail requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Query strings of product list requests, oldest first.
    #[must_use]
    pub fn product_queries(&self) -> Vec<HashMap<String, String>> {
        lock(&self.state.product_queries).clone()
    }

    /// Forms posted to `/auth/login`, oldest first.
    #[must_use]
    pub fn login_forms(&self) -> Vec<HashMap<String, String>> {
        lock(&self.state.login_forms).clone()
    }

    /// Bodies posted to `/auth/register`, oldest first.
    #[must_use]
    pub fn registrations(&self) -> Vec<Value> {
        lock(&self.state.registrations).clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Three products: two on sale, one inactive.
#[must_use]
pub fn default_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "چای سبز", "description": "چای سبز لاهیجان",
            "category": "tea", "price": 85000, "currency": "IRT",
            "image_url": "/uploads/green-tea.jpg", "slug": "green-tea",
            "stock": 10, "is_active": true,
            "created_at": "2024-05-01T10:00:00", "updated_at": "2024-05-01T10:00:00"
        }),
        json!({
            "id": 2, "name": "قهوه اسپرسو", "description": null,
            "category": "coffee", "price": 120000, "currency": "IRT",
            "image_url": null, "slug": "espresso",
            "stock": 5, "is_active": true,
            "created_at": "2024-05-01T10:00:00", "updated_at": "2024-05-01T10:00:00"
        }),
        json!({
            "id": 3, "name": "دمنوش بابونه", "description": "",
            "category": "tea", "price": 45000, "currency": "IRT",
            "image_url": null, "slug": "chamomile",
            "stock": 0, "is_active": false,
            "created_at": "2024-05-01T10:00:00", "updated_at": "2024-05-01T10:00:00"
        }),
    ]
}

/// Two homepage banners.
#[must_use]
pub fn default_banners() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "key": "hero", "title": "حراج بهاره",
            "image_url": "/uploads/hero.jpg", "link_url": "/products/1",
            "price": 85000, "currency": "IRT", "active": true, "position": 0,
            "updated_at": "2024-05-01T10:00:00"
        }),
        json!({
            "id": 2, "key": "side-1", "title": null,
            "image_url": "/uploads/side.jpg", "link_url": null,
            "price": 120000, "currency": "IRT", "active": true, "position": 1,
            "updated_at": "2024-05-01T10:00:00"
        }),
    ]
}

// =============================================================================
// Handlers
// =============================================================================

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn list_products(
    State(state): State<Arc<BackendState>>,
    Query(params): Query<Params>,
) -> Json<Value> {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    lock(&state.product_queries).push(params.clone());

    let query = params.get("query");
    let limit = params
        .get("limit")
        .and_then(|l| l.parse::<usize>().ok())
        .unwrap_or(usize::MAX);

    let products = state
        .products
        .iter()
        .filter(|p| {
            query.is_none_or(|q| p["name"].as_str().is_some_and(|name| name.contains(q.as_str())))
        })
        .take(limit)
        .cloned()
        .collect();

    Json(Value::Array(products))
}

async fn get_product(State(state): State<Arc<BackendState>>, UrlPath(id): UrlPath<i64>) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);

    state.products.iter().find(|p| p["id"] == id).map_or_else(
        || detail(StatusCode::NOT_FOUND, "Product not found"),
        |p| Json(p.clone()).into_response(),
    )
}

async fn list_banners(State(state): State<Arc<BackendState>>) -> Json<Value> {
    Json(Value::Array(state.banners.clone()))
}

async fn get_banner(
    State(state): State<Arc<BackendState>>,
    UrlPath(key): UrlPath<String>,
) -> Response {
    state.banners.iter().find(|b| b["key"] == key.as_str()).map_or_else(
        || detail(StatusCode::NOT_FOUND, "Banner not found"),
        |b| Json(b.clone()).into_response(),
    )
}

async fn login(State(state): State<Arc<BackendState>>, Form(form): Form<Params>) -> Response {
    lock(&state.login_forms).push(form.clone());

    let username = form.get("username").map(String::as_str);
    let password = form.get("password").map(String::as_str);
    if username == Some(VALID_USERNAME) && password == Some(VALID_PASSWORD) {
        Json(json!({ "access_token": LOGIN_TOKEN, "token_type": "bearer" })).into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn register(State(state): State<Arc<BackendState>>, Json(body): Json<Value>) -> Response {
    if body["username"] == TAKEN_USERNAME {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }

    lock(&state.registrations).push(body);
    Json(json!({ "access_token": REGISTER_TOKEN, "token_type": "bearer" })).into_response()
}

async fn current_user(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if state.user_lookup_failing.load(Ordering::SeqCst) {
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable");
    }

    match bearer(&headers) {
        Some(LOGIN_TOKEN) => Json(json!({
            "id": 1, "first_name": "علی", "last_name": "رضایی",
            "email": "ali@ishop.ir", "username": VALID_USERNAME
        }))
        .into_response(),
        Some(REGISTER_TOKEN) => lock(&state.registrations).last().map_or_else(unauthorized, |r| {
            Json(json!({
                "id": 2,
                "first_name": r["first_name"],
                "last_name": r["last_name"],
                "email": r["email_or_phone"],
                "username": r["username"]
            }))
            .into_response()
        }),
        _ => unauthorized(),
    }
}

fn receipt(index: usize, order: &Value) -> Value {
    json!({ "id": index + 1, "user_id": 1, "total": order["total"], "status": "created" })
}

async fn create_order(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !matches!(bearer(&headers), Some(LOGIN_TOKEN | REGISTER_TOKEN)) {
        return unauthorized();
    }

    let failure = *lock(&state.order_failure);
    if let Some(code) = failure {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status == StatusCode::TOO_MANY_REQUESTS {
            return (status, [(header::RETRY_AFTER, "7")], "slow down").into_response();
        }
        return (status, "order service unavailable").into_response();
    }

    let mut orders = lock(&state.orders);
    let response = receipt(orders.len(), &body);
    orders.push(body);
    Json(response).into_response()
}

async fn list_orders(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if bearer(&headers).is_none() {
        return unauthorized();
    }

    let orders = lock(&state.orders);
    let receipts: Vec<Value> = orders
        .iter()
        .enumerate()
        .rev()
        .map(|(i, order)| receipt(i, order))
        .collect();
    Json(Value::Array(receipts)).into_response()
}
