//! Auth request group: register, login, logout and the authenticated
//! profile read.
//!
//! Register and login are public (no bearer header); logout invalidates
//! the `Auth` tag on success. Neither login nor register stores the token
//! anywhere — the caller decides what to do with it.

use kabinet_model::{ApiMessage, AuthResponse, Credentials, User};
use log::info;

use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::query_cache::Tag;

/// Auth operations over a shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `POST auth/register`. Fails with 400/409 on validation or conflict.
    pub async fn register(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthResponse, ApiError> {
        self.client.post_public("auth/register", credentials).await
    }

    /// `POST auth/login`. Fails with 401 on bad credentials.
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse =
            self.client.post_public("auth/login", credentials).await?;
        info!("[AuthApi] logged in as {}", response.user.username);
        Ok(response)
    }

    /// `POST auth/logout`. Invalidates the `Auth` tag on success.
    pub async fn logout(&self) -> Result<ApiMessage, ApiError> {
        let message: ApiMessage =
            self.client.post_empty("auth/logout").await?;
        self.client.cache().invalidate(Tag::Auth).await;
        Ok(message)
    }

    /// `GET auth/profile`, cached under the `Auth` tag.
    pub async fn auth_profile(&self) -> Result<User, ApiError> {
        let client = self.client.clone();
        self.client
            .cache()
            .get_or_fetch("auth/profile", &[Tag::Auth], async move {
                client.get("auth/profile").await
            })
            .await
    }
}
