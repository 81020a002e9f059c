//! HTTP core shared by both request groups.
//!
//! Holds the reqwest client, the base URL, the session token slot and the
//! shared [`QueryCache`]. The token is handed in explicitly at
//! construction or on login; request building never reads ambient storage.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use reqwest::{Client, RequestBuilder, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::{ApiError, extract_message};
use crate::query_cache::QueryCache;

/// API client with bearer-token authentication.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
    cache: QueryCache,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        // Normalize the provided base URL so we don't trip over missing
        // schemes: "localhost:3000" is rejected by reqwest as-is, and a
        // trailing slash would produce double slashes in built URLs.
        fn normalize(raw: String) -> String {
            let trimmed = raw.trim().trim_end_matches('/').to_string();
            if trimmed.starts_with("http://")
                || trimmed.starts_with("https://")
            {
                trimmed
            } else {
                format!("http://{trimmed}")
            }
        }

        let base_url = normalize(base_url.into());
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        info!("[ApiClient] created with base URL {base_url}");

        Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
            cache: QueryCache::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The cache shared by every request group on this client.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Install or replace the session token.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer header when a token is present. Requests without
    /// a token still go out; rejecting them is the server's job.
    async fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token.read().await.as_ref() {
            builder.header("Authorization", format!("Bearer {token}"))
        } else {
            builder
        }
    }

    /// Execute a request and map the response uniformly.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|err| ApiError::Decode(err.to_string()))
        } else {
            let body = response.text().await.unwrap_or_default();
            debug!("[ApiClient] request failed with {status}: {body}");
            Err(ApiError::Http {
                status,
                message: extract_message(&body),
            })
        }
    }

    /// Authenticated GET returning a typed body.
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<R, ApiError> {
        let request = self.client.get(self.build_url(path));
        let request = self.with_auth(request).await;
        self.execute(request).await
    }

    /// Authenticated GET returning the raw body bytes (avatar blobs).
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let request = self.client.get(self.build_url(path));
        let request = self.with_auth(request).await;
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Http {
                status,
                message: extract_message(&body),
            })
        }
    }

    /// Authenticated POST with a JSON body.
    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let request = self.client.post(self.build_url(path)).json(body);
        let request = self.with_auth(request).await;
        self.execute(request).await
    }

    /// POST without a bearer header, for register/login.
    pub async fn post_public<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.execute(request).await
    }

    /// Authenticated POST with an empty body (logout, restore,
    /// refresh-url).
    pub async fn post_empty<R: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<R, ApiError> {
        let request = self.client.post(self.build_url(path));
        let request = self.with_auth(request).await;
        self.execute(request).await
    }

    /// Authenticated multipart POST (avatar upload).
    pub async fn post_multipart<R: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<R, ApiError> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        let request = self.with_auth(request).await;
        self.execute(request).await
    }

    /// Authenticated PUT with a JSON body.
    pub async fn put<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let request = self.client.put(self.build_url(path)).json(body);
        let request = self.with_auth(request).await;
        self.execute(request).await
    }

    /// Authenticated DELETE.
    pub async fn delete<R: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<R, ApiError> {
        let request = self.client.delete(self.build_url(path));
        let request = self.with_auth(request).await;
        self.execute(request).await
    }
}
