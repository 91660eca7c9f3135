//! # HTTP Transport
//!
//! The request/response seam every workflow talks through.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transport Request Flow                               │
//! │                                                                         │
//! │  workflow ──► Transport::get("/api/menus/1")                           │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │  HttpTransport  base_url.join(path) ──► https://demo.bistro.app/...   │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │               reqwest (timeout, Accept: application/ld+json, bearer)   │
//! │                    │                                                    │
//! │           ┌────────┴────────┐                                          │
//! │           ▼                 ▼                                           │
//! │        2xx: JSON         non-2xx: ClientError::Status { status, body } │
//! │        (empty → null)                                                   │
//! │                                                                         │
//! │  Absolute IRIs (https://...) are fetched as-is. Timeouts surface as    │
//! │  ClientError::Timeout. Nothing is retried here.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};

/// JSON-LD media type spoken by the ordering API.
pub const JSON_LD: &str = "application/ld+json";

// =============================================================================
// Transport Trait
// =============================================================================

/// Sends JSON requests to the ordering API.
///
/// `path` is either a server-relative path (`/api/orders`) or an IRI taken
/// from a previous response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> ClientResult<Value>;
    async fn post(&self, path: &str, body: Value) -> ClientResult<Value>;
    async fn put(&self, path: &str, body: Value) -> ClientResult<Value>;
}

// =============================================================================
// reqwest Implementation
// =============================================================================

/// Default [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let base_url = settings.parsed_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_LD));
        if let Some(token) = &settings.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::InvalidConfig("API token is not a valid header".into()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(HttpTransport { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path or IRI against the base URL.
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(&self, method: &'static str, request: RequestBuilder) -> ClientResult<Value> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, method, status = status.as_u16(), "Request rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        debug!(%url, method, status = status.as_u16(), len = bytes.len(), "Response received");

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> ClientResult<Value> {
        let url = self.url(path)?;
        self.send("GET", self.client.get(url)).await
    }

    async fn post(&self, path: &str, body: Value) -> ClientResult<Value> {
        let url = self.url(path)?;
        self.send("POST", self.client.post(url).json(&body)).await
    }

    async fn put(&self, path: &str, body: Value) -> ClientResult<Value> {
        let url = self.url(path)?;
        self.send("PUT", self.client.put(url).json(&body)).await
    }
}
