//! Session/auth manager.
//!
//! Owns who is logged in. The session lives in two local-storage keys (the
//! user record and the bearer token) and in a `watch` channel that views
//! subscribe to. Login and signup write both keys before publishing; logout
//! clears them no matter what the server says.

use client::{
    ApiClient, ApiError,
    api::auth::{AuthResponse, AuthUser, RegisterRequest, Role},
    error::NETWORK_ERROR_MESSAGE,
};
use common::format_validation_errors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use util::notify::NotificationCenter;
use util::storage::LocalStorage;
use validator::{Validate, ValidationError};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

/// The logged-in user as persisted under the user storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub is_admin: bool,
}

impl Session {
    pub fn from_user(user: &AuthUser) -> Self {
        Self {
            id: user.id.clone(),
            name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_admin: user.role == Role::Admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Form input blocked before any request.
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Rejected { message: String },

    #[error("{0}")]
    Network(String),

    #[error("could not save session: {0}")]
    Storage(String),
}

impl AuthError {
    fn from_api(err: ApiError, fallback: &str) -> Self {
        match err {
            e if e.is_transport() => AuthError::Network(NETWORK_ERROR_MESSAGE.to_string()),
            other => AuthError::Rejected {
                message: other.user_message(fallback),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct SignupForm {
    #[validate(custom(function = "not_blank", message = "Full name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    pub role: Role,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

struct Inner {
    api: ApiClient,
    notifications: NotificationCenter,
    user_key: String,
    state: watch::Sender<Option<Session>>,
}

/// Cheap to clone; all clones share one session.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Seeds the session from storage. No network call is made; a corrupt
    /// record is logged, removed and treated as absent.
    pub fn new(api: ApiClient, notifications: NotificationCenter, user_key: impl Into<String>) -> Self {
        let user_key = user_key.into();
        let restored = restore(&api, &user_key);
        if let Some(session) = &restored {
            tracing::info!(user_id = %session.id, role = %session.role, "restored session");
        }

        Self {
            inner: Arc::new(Inner {
                api,
                notifications,
                user_key,
                state: watch::channel(restored).0,
            }),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.api.bearer_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_some()
    }

    /// Observes every session change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.state.subscribe()
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            let err = AuthError::Validation("Email and password are required".to_string());
            self.inner.notifications.error(err.to_string()).await;
            return Err(err);
        }

        let result = self.inner.api.login(email, password).await;
        let session = self.complete(result, LOGIN_FAILED).await?;
        self.inner
            .notifications
            .success(format!("Welcome back, {}!", session.name))
            .await;
        Ok(session)
    }

    pub async fn signup(&self, form: SignupForm) -> Result<Session, AuthError> {
        if let Err(errors) = form.validate() {
            let err = AuthError::Validation(format_validation_errors(&errors));
            self.inner.notifications.error(err.to_string()).await;
            return Err(err);
        }

        let request = RegisterRequest {
            full_name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password,
            confirm_password: form.confirm_password,
            role: form.role,
        };
        let result = self.inner.api.register(&request).await;
        let session = self.complete(result, REGISTRATION_FAILED).await?;
        self.inner
            .notifications
            .success("Account created successfully!")
            .await;
        Ok(session)
    }

    /// Best-effort server logout; local state is always cleared afterwards.
    pub async fn logout(&self) {
        if self.inner.api.bearer_token().is_some() {
            if let Err(e) = self.inner.api.logout().await {
                tracing::warn!(error = %e, "server logout failed; clearing local session anyway");
            }
        }

        let storage = self.inner.api.storage();
        if let Err(e) = storage.remove_item(&self.inner.user_key) {
            tracing::error!(error = %e, "failed to remove stored user");
        }
        if let Err(e) = storage.remove_item(self.inner.api.token_key()) {
            tracing::error!(error = %e, "failed to remove stored token");
        }

        self.inner.state.send_replace(None);
        self.inner.notifications.info("Logged out").await;
    }

    async fn complete(
        &self,
        result: Result<AuthResponse, ApiError>,
        fallback: &str,
    ) -> Result<Session, AuthError> {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let err = AuthError::from_api(e, fallback);
                self.inner.notifications.error(err.to_string()).await;
                return Err(err);
            }
        };

        let session = Session::from_user(&response.user);
        if let Err(err) = self.persist(&session, response.token.as_deref().unwrap_or_default()) {
            self.inner.notifications.error(err.to_string()).await;
            return Err(err);
        }

        tracing::info!(user_id = %session.id, role = %session.role, "session started");
        self.inner.state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Writes the user record and the token as one unit: when either write
    /// fails both keys are put back to what they held before.
    fn persist(&self, session: &Session, token: &str) -> Result<(), AuthError> {
        let raw = serde_json::to_string(session).map_err(|e| AuthError::Storage(e.to_string()))?;
        let storage = self.inner.api.storage();
        let user_key = self.inner.user_key.as_str();
        let token_key = self.inner.api.token_key();
        let prior_user = storage.get_item(user_key);
        let prior_token = storage.get_item(token_key);

        let written = storage
            .set_item(user_key, &raw)
            .and_then(|_| storage.set_item(token_key, token));
        if let Err(e) = written {
            tracing::error!(error = %e, "session write failed; restoring previous session");
            restore_item(storage.as_ref(), user_key, prior_user.as_deref());
            restore_item(storage.as_ref(), token_key, prior_token.as_deref());
            return Err(AuthError::Storage(e.to_string()));
        }
        Ok(())
    }
}

fn restore_item(storage: &dyn LocalStorage, key: &str, prior: Option<&str>) {
    let result = match prior {
        Some(value) => storage.set_item(key, value),
        None => storage.remove_item(key),
    };
    if let Err(e) = result {
        tracing::error!(%key, error = %e, "failed to restore stored value");
    }
}

fn restore(api: &ApiClient, user_key: &str) -> Option<Session> {
    let raw = api.storage().get_item(user_key)?;
    match serde_json::from_str::<Session>(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "discarding corrupt stored session");
            if let Err(e) = api.storage().remove_item(user_key) {
                tracing::error!(error = %e, "failed to remove corrupt stored session");
            }
            None
        }
    }
}
