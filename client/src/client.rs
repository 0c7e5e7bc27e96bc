//! The shared REST client.
//!
//! One `ApiClient` is cloned into every service. It owns the HTTP connection
//! pool, the endpoint table and a handle to local storage, from which the bearer
//! token is read at the start of each privileged request.

use common::config::AppConfig;
use reqwest::{Method, RequestBuilder, Response, multipart::Form};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use util::storage::SharedStorage;

use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::http::{build_http_client, is_url_alive};
use crate::response::ErrorBody;

/// Query string pairs, in order.
pub type Query = [(String, String)];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Storage key the bearer token lives under.
    pub token_key: String,
}

impl ClientConfig {
    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self {
            base_url: cfg.api_base_url.clone(),
            timeout: Duration::from_secs(cfg.request_timeout_secs.max(1)),
            token_key: cfg.token_storage_key.clone(),
        }
    }
}

/// How a request is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// Public endpoint; no header.
    None,
    /// Privileged endpoint; fails with `Unauthenticated` when no token is stored.
    Bearer,
    /// Header attached when a token is stored.
    Optional,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoints: Arc<Endpoints>,
    storage: SharedStorage,
    token_key: Arc<str>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, storage: SharedStorage) -> Result<Self, ApiError> {
        let endpoints = Endpoints::new(&config.base_url)?;
        let http = build_http_client(config.timeout)?;
        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            storage,
            token_key: config.token_key.into(),
        })
    }

    /// Client configured from the global `AppConfig`.
    pub fn from_app_config(storage: SharedStorage) -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_app_config(&AppConfig::global()), storage)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// The stored bearer token. An empty value counts as none.
    pub fn bearer_token(&self) -> Option<String> {
        self.storage
            .get_item(&self.token_key)
            .filter(|t| !t.trim().is_empty())
    }

    /// Whether the API base URL answers.
    pub async fn is_reachable(&self) -> bool {
        is_url_alive(&self.http, self.endpoints.base()).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &Query,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::GET, url, auth)?.query(query);
        self.execute(req).await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B, auth: Auth) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, url, auth)?.json(body);
        self.execute(req).await
    }

    pub async fn put_json<B, T>(&self, url: &str, body: &B, auth: Auth) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, url, auth)?.json(body);
        self.execute(req).await
    }

    /// DELETE; the response body is ignored.
    pub async fn delete(&self, url: &str, auth: Auth) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, url, auth)?;
        let resp = self.send(req).await?;
        drop(resp);
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::POST, url, auth)?.multipart(form);
        self.execute(req).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(
        &self,
        url: &str,
        form: Form,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::PUT, url, auth)?.multipart(form);
        self.execute(req).await
    }

    fn request(&self, method: Method, url: &str, auth: Auth) -> Result<RequestBuilder, ApiError> {
        let token = match auth {
            Auth::None => None,
            Auth::Optional => self.bearer_token(),
            Auth::Bearer => Some(self.bearer_token().ok_or(ApiError::Unauthenticated)?),
        };

        let mut req = self.http.request(method, url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    /// Sends and maps non-2xx answers to `Rejected`.
    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(|e| {
            let err = ApiError::from(e);
            tracing::warn!(error = %err, "request failed");
            err
        })?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(url = %resp.url(), status = status.as_u16(), "request succeeded");
            return Ok(resp);
        }

        let url = resp.url().to_string();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        tracing::warn!(%url, status = status.as_u16(), message = ?message, "request rejected");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Sends and decodes the JSON body. An empty body decodes as `{}`.
    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        let text = resp.text().await?;
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}
