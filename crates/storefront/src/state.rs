//! Application state shared across commands.

use std::sync::Arc;

use ishop_core::{CartStore, KeyValueCartPersistence, NewLineItem, ProductId, Quantity};
use tracing::instrument;

use crate::api::{ApiClient, Product, User};
use crate::auth::AuthSession;
use crate::checkout::{CheckoutError, CheckoutOutcome, submit_order};
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError, add_breadcrumb};
use crate::storage::FileStore;

/// Cart persisted to the data directory.
pub type FileCart = CartStore<KeyValueCartPersistence<Arc<FileStore>>>;

/// Everything a front end needs: configuration, the API client, the cart
/// and the sign-in session, all backed by one [`FileStore`].
#[derive(Debug)]
pub struct AppState {
    config: StorefrontConfig,
    store: Arc<FileStore>,
    cart: FileCart,
    auth: AuthSession<Arc<FileStore>>,
}

impl AppState {
    /// Create the state and load the persisted cart.
    ///
    /// The stored auth token is not checked here; call
    /// [`AppState::restore_session`] for that.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built or the data
    /// directory cannot be created.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let api = ApiClient::from_config(&config)?;
        let store = Arc::new(FileStore::open(&config.data_dir)?);

        let cart = CartStore::load(KeyValueCartPersistence::new(Arc::clone(&store)));
        let auth = AuthSession::new(api, Arc::clone(&store));

        Ok(Self {
            config,
            store,
            cart,
            auth,
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Get a reference to the API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        self.auth.api()
    }

    /// Get a reference to the cart.
    #[must_use]
    pub const fn cart(&self) -> &FileCart {
        &self.cart
    }

    /// Get a mutable reference to the cart.
    pub const fn cart_mut(&mut self) -> &mut FileCart {
        &mut self.cart
    }

    /// Get a reference to the sign-in session.
    #[must_use]
    pub const fn auth(&self) -> &AuthSession<Arc<FileStore>> {
        &self.auth
    }

    /// Get a mutable reference to the sign-in session.
    pub const fn auth_mut(&mut self) -> &mut AuthSession<Arc<FileStore>> {
        &mut self.auth
    }

    /// Pick up the stored auth token, if it is still valid.
    pub async fn restore_session(&mut self) -> Option<&User> {
        self.auth.restore().await
    }

    /// Fetch a product and add one unit of it to the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Api` if the product cannot be fetched, or
    /// `StorefrontError::BadRequest` if it is no longer for sale.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_product(&mut self, id: ProductId) -> Result<(Product, Quantity)> {
        let product = self.api().product(id).await?;
        if !product.is_active {
            return Err(StorefrontError::BadRequest(format!(
                "product {id} is not for sale"
            )));
        }

        let quantity = self.cart.add_item(NewLineItem::from(&product));
        let id = id.to_string();
        add_breadcrumb("cart", "Added item", Some(&[("product_id", id.as_str())]));

        Ok((product, quantity))
    }

    /// Submit the cart as an order for the signed-in user.
    ///
    /// # Errors
    ///
    /// See [`submit_order`].
    pub async fn checkout(&mut self) -> std::result::Result<CheckoutOutcome, CheckoutError> {
        submit_order(&mut self.cart, self.auth.api(), self.auth.current_user()).await
    }
}
