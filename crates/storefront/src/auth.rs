//! Sign-in state.
//!
//! The bearer token lives in the [`ApiClient`] for requests and in the
//! key-value store under [`AUTH_TOKEN_KEY`] so the next run can pick it up.

use ishop_core::{Contact, ContactError, KeyValueStore, StorageError};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, LoginRequest, RegisterRequest, User};
use crate::error::{clear_sentry_user, set_sentry_user};

/// Storage key of the persisted bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong identifier or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// `email_or_phone` is neither an email nor an Iranian mobile number.
    #[error("invalid email or mobile number: {0}")]
    InvalidContact(#[from] ContactError),

    /// A required form field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Token storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The signed-in user, if any, and the token that proves it.
#[derive(Debug)]
pub struct AuthSession<S: KeyValueStore> {
    api: ApiClient,
    store: S,
    user: Option<User>,
}

impl<S: KeyValueStore> AuthSession<S> {
    /// A signed-out session. Call [`AuthSession::restore`] to pick up a
    /// stored token.
    #[must_use]
    pub const fn new(api: ApiClient, store: S) -> Self {
        Self {
            api,
            store,
            user: None,
        }
    }

    /// Load the stored token and check it against the backend.
    ///
    /// Any failure discards the stored token and leaves the session signed
    /// out.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) -> Option<&User> {
        let token = match self.store.get(AUTH_TOKEN_KEY) {
            Ok(Some(token)) if !token.trim().is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored auth token");
                return None;
            }
        };

        self.api.set_token(SecretString::from(token.trim().to_string()));

        match self.api.current_user().await {
            Ok(user) => Some(self.signed_in(user)),
            Err(e) => {
                warn!(error = %e, "Stored auth token rejected, signing out");
                self.forget_token();
                None
            }
        }
    }

    /// Sign in with a username, email or mobile number.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the
    /// credentials, `AuthError::MissingField` for blank input, or
    /// `AuthError::Api` for any other failure.
    #[instrument(skip_all)]
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<&User, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::MissingField("identifier"));
        }
        if password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let response = self
            .api
            .login(&LoginRequest::new(identifier, password))
            .await
            .map_err(credentials_error)?;
        self.finish_sign_in(&response.access_token).await
    }

    /// Create an account and sign in with it.
    ///
    /// `email_or_phone` is validated locally and sent in normalized form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidContact` or `AuthError::MissingField` for
    /// bad input, or `AuthError::Api` if the backend refuses the account.
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&mut self, mut request: RegisterRequest) -> Result<&User, AuthError> {
        let contact = Contact::parse(&request.email_or_phone)?;
        request.email_or_phone = contact.as_str().to_string();
        request.username = request.username.trim().to_string();

        if request.username.is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if request.password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let response = self.api.register(&request).await?;
        self.finish_sign_in(&response.access_token).await
    }

    /// Forget the token, in memory and in storage.
    pub fn logout(&mut self) {
        self.forget_token();
        if self.user.take().is_some() {
            info!("Signed out");
        }
    }

    /// The signed-in user.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The API client carrying this session's token.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch the account behind a freshly issued token. The token is only
    /// persisted once that succeeds; otherwise it is dropped everywhere.
    async fn finish_sign_in(&mut self, token: &SecretString) -> Result<&User, AuthError> {
        self.api.set_token(token.clone());
        match self.api.current_user().await {
            Ok(user) => {
                self.store_token(token);
                Ok(self.signed_in(user))
            }
            Err(e) => {
                warn!(error = %e, "Could not load the new account, discarding token");
                self.forget_token();
                Err(e.into())
            }
        }
    }

    fn signed_in(&mut self, user: User) -> &User {
        set_sentry_user(&user.id, Some(user.email.as_str()).filter(|e| !e.is_empty()));
        info!(user_id = %user.id, "Signed in");
        self.user.insert(user)
    }

    /// Persist the token. A failed write keeps the session signed in for
    /// this run only.
    fn store_token(&self, token: &SecretString) {
        if let Err(e) = self.store.set(AUTH_TOKEN_KEY, token.expose_secret()) {
            warn!(error = %e, "Failed to persist auth token");
        }
    }

    fn forget_token(&self) {
        self.api.clear_token();
        if let Err(e) = self.store.remove(AUTH_TOKEN_KEY) {
            warn!(error = %e, "Failed to remove stored auth token");
        }
        clear_sentry_user();
    }
}

/// Login failures with a 400/401 answer mean bad credentials.
fn credentials_error(error: ApiError) -> AuthError {
    match error {
        ApiError::Unauthorized | ApiError::Status { status: 400 | 401, .. } => {
            AuthError::InvalidCredentials
        }
        other => AuthError::Api(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use ishop_core::MemoryStore;

    use super::*;

    fn offline_api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9/api/v1", Duration::from_millis(200)).unwrap()
    }

    fn form(email_or_phone: &str, username: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "علی".to_string(),
            last_name: "رضایی".to_string(),
            email_or_phone: email_or_phone.to_string(),
            password: SecretString::from("s3cret-pass".to_string()),
            username: username.to_string(),
        }
    }

    #[tokio::test]
    async fn test_restore_without_token_stays_signed_out() {
        let mut session = AuthSession::new(offline_api(), MemoryStore::new());
        assert!(session.restore().await.is_none());
        assert!(!session.is_authenticated());
        assert!(!session.api().has_token());
    }

    #[tokio::test]
    async fn test_restore_with_unreachable_backend_discards_token() {
        let store = MemoryStore::with_entry(AUTH_TOKEN_KEY, "stale");
        let mut session = AuthSession::new(offline_api(), &store);

        assert!(session.restore().await.is_none());
        assert!(!session.api().has_token());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_validates_contact_before_network() {
        let mut session = AuthSession::new(offline_api(), MemoryStore::new());

        let err = session.register(form("not-a-phone", "ali")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidContact(ContactError::Mobile(_))));

        let err = session.register(form("ali@", "ali")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidContact(ContactError::Email(_))));

        let err = session
            .register(form("09123456789", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("username")));
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let mut session = AuthSession::new(offline_api(), MemoryStore::new());
        let err = session.login("  ", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("identifier")));
        let err = session.login("ali", "").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("password")));
    }

    #[test]
    fn test_logout_clears_stored_token() {
        let store = MemoryStore::with_entry(AUTH_TOKEN_KEY, "tok");
        let api = offline_api();
        api.set_token(SecretString::from("tok"));

        let mut session = AuthSession::new(api, &store);
        session.logout();

        assert!(!session.api().has_token());
        assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_credentials_error_mapping() {
        assert!(matches!(
            credentials_error(ApiError::Unauthorized),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            credentials_error(ApiError::Status {
                status: 400,
                body: String::new()
            }),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            credentials_error(ApiError::Status {
                status: 503,
                body: String::new()
            }),
            AuthError::Api(_)
        ));
    }
}
