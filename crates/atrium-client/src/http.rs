//! HTTP client for the backend API gateway.
//!
//! One reqwest client with a fixed overall timeout. Every authenticated
//! request carries the bearer token; tenant scoping travels in an
//! `X-Tenant-ID` header. Failures are normalized into the console error
//! taxonomy. No retries, no backoff: one request per user action.

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use atrium_core::{defaults, Error, Result};

/// Header carrying the tenant scope.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Shared HTTP client for all gateway façades.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
    tenant_id: RwLock<Option<Uuid>>,
}

impl ApiClient {
    /// Create a client against a gateway base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, defaults::REQUEST_TIMEOUT_SECS)
    }

    /// Create a client with an explicit overall timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let base_url = base_url.into();
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(base_url = %base_url, timeout_secs, "initializing API client");
        Self {
            http,
            base_url,
            token: RwLock::new(None),
            tenant_id: RwLock::new(None),
        }
    }

    /// Create from environment variables.
    ///
    /// `ATRIUM_API_BASE` → gateway base URL, `ATRIUM_TIMEOUT_SECS` →
    /// overall request timeout.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ATRIUM_API_BASE").unwrap_or_else(|_| defaults::API_BASE.to_string());
        let timeout = std::env::var("ATRIUM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::REQUEST_TIMEOUT_SECS);
        Self::with_timeout(base_url, timeout)
    }

    /// Set (or clear) the bearer token used for subsequent requests.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    /// Set (or clear) the tenant scope stamped on subsequent requests.
    pub fn set_tenant(&self, tenant_id: Option<Uuid>) {
        *self.tenant_id.write().expect("tenant lock poisoned") = tenant_id;
    }

    /// GET a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        Self::decode(response).await
    }

    /// POST a JSON body, expect a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// PATCH a JSON body, expect a JSON response.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PATCH, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// POST with no body, expect a JSON response (entity actions such as
    /// pause/resume/sync).
    pub async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::POST, path).send().await?;
        Self::decode(response).await
    }

    /// DELETE a resource, expect an empty success.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(response).await.map(|_| ())
    }

    /// POST a JSON body and return the raw byte stream of the response
    /// (SSE endpoints).
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<
        impl futures::Stream<Item = std::result::Result<bytes::Bytes, reqwest::Error>> + 'static,
    > {
        let response = self.request(Method::POST, path).json(body).send().await?;
        let response = Self::check(response).await?;
        Ok(response.bytes_stream())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        debug!(method = %method, url = %url, "gateway request");
        let mut builder = self.http.request(method, url);

        if let Some(token) = self.token.read().expect("token lock poisoned").as_ref() {
            builder = builder.bearer_auth(token);
        }
        if let Some(tenant) = self.tenant_id.read().expect("tenant lock poisoned").as_ref() {
            builder = builder.header(TENANT_HEADER, tenant.to_string());
        }
        builder
    }

    // Map non-2xx responses into the error taxonomy, preferring the
    // gateway's own error message when the body carries one.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        Err(Error::from_status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }
}
