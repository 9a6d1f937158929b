//! HTTP plumbing for the order service
//!
//! [`ApiClient`] owns the reqwest client, joins endpoint paths onto the
//! configured base URL and attaches the bearer header from a
//! [`SessionContext`]. It classifies failures into [`RemoteError`] so nothing
//! above this layer sees reqwest types.

use super::models::DocumentBytes;
use crate::config::ApiConfig;
use crate::domain::{DeskError, RemoteError, Result};
use crate::session::SessionContext;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Thin authenticated client over the order service REST API
///
/// # Example
///
/// ```no_run
/// use orderdesk::adapters::remote::ApiClient;
/// use orderdesk::config::ApiConfig;
///
/// # fn example() -> orderdesk::domain::Result<()> {
/// let client = ApiClient::new(&ApiConfig::default())?;
/// assert!(client.base_url().ends_with("/api/v1"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled for the order service"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| DeskError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of one item in `collection`, with `id` escaped as a single path segment
    fn item_url(&self, collection: &str, id: &str) -> std::result::Result<url::Url, RemoteError> {
        let mut url = url::Url::parse(&self.url(collection))
            .map_err(|e| RemoteError::InvalidRequest(format!("{collection}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidRequest(format!("{collection}: not a base URL")))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Attach the bearer header; an empty token sends no header at all
    fn authorize(&self, request: RequestBuilder, session: &SessionContext) -> RequestBuilder {
        match session.bearer() {
            Some(bearer) => request.header(AUTHORIZATION, bearer),
            None => {
                tracing::debug!("No session token, sending unauthenticated request");
                request
            }
        }
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &SessionContext,
    ) -> std::result::Result<T, RemoteError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");

        let request = self.authorize(self.client.get(&url), session);
        let response = send(request).await?;
        let response = ensure_success(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("{path}: {e}")))
    }

    /// PUT a JSON body to `{collection}/{id}`; the response body is ignored
    pub async fn put_item<B: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
        session: &SessionContext,
    ) -> std::result::Result<(), RemoteError> {
        let url = self.item_url(collection, id)?;
        tracing::debug!(url = %url, "PUT");

        let request = self.authorize(self.client.put(url).json(body), session);
        ensure_success(send(request).await?).await?;
        Ok(())
    }

    /// DELETE `{collection}/{id}`
    pub async fn delete_item(
        &self,
        collection: &str,
        id: &str,
        session: &SessionContext,
    ) -> std::result::Result<(), RemoteError> {
        let url = self.item_url(collection, id)?;
        tracing::debug!(url = %url, "DELETE");

        let request = self.authorize(self.client.delete(url), session);
        ensure_success(send(request).await?).await?;
        Ok(())
    }

    /// POST a JSON body to `path` and return the raw response document
    pub async fn post_for_document<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        session: &SessionContext,
    ) -> std::result::Result<DocumentBytes, RemoteError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "POST");

        let request = self.authorize(self.client.post(&url).json(body), session);
        let response = send(request).await?;
        let response = ensure_success(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RemoteError::InvalidResponse(format!("{path}: {e}")))?;

        Ok(DocumentBytes {
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}

async fn send(request: RequestBuilder) -> std::result::Result<Response, RemoteError> {
    request.send().await.map_err(|e| {
        if e.is_timeout() {
            RemoteError::Timeout(e.to_string())
        } else {
            RemoteError::ConnectionFailed(e.to_string())
        }
    })
}

async fn ensure_success(response: Response) -> std::result::Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    };
    Err(RemoteError::from_status(status.as_u16(), message))
}
