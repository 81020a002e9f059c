//! User/profile request group.
//!
//! Reads register under the `User` or `Profile` tag; every successful
//! mutation invalidates the tag of the data it touched, so the next read
//! under that tag refetches instead of serving a stale snapshot.

use kabinet_model::{
    ApiMessage, AvatarUploadResponse, Profile, UpdateProfileRequest,
    UpdateUserRequest, User,
};
use log::info;
use reqwest::multipart::{Form, Part};

use crate::api_client::ApiClient;
use crate::error::ApiError;
use crate::query_cache::Tag;

const USER_KEY: &str = "user/me";
const PROFILE_KEY: &str = "user/profile";

/// User and profile operations over a shared [`ApiClient`].
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET user/me`, cached under the `User` tag.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let client = self.client.clone();
        self.client
            .cache()
            .get_or_fetch(USER_KEY, &[Tag::User], async move {
                client.get(USER_KEY).await
            })
            .await
    }

    /// `GET user/profile`, cached under the `Profile` tag.
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let client = self.client.clone();
        self.client
            .cache()
            .get_or_fetch(PROFILE_KEY, &[Tag::Profile], async move {
                client.get(PROFILE_KEY).await
            })
            .await
    }

    /// Cache-bypassing read of `user/me`.
    pub async fn refetch_user(&self) -> Result<User, ApiError> {
        let client = self.client.clone();
        self.client
            .cache()
            .refetch(USER_KEY, &[Tag::User], async move {
                client.get(USER_KEY).await
            })
            .await
    }

    /// Cache-bypassing read of `user/profile`.
    pub async fn refetch_profile(&self) -> Result<Profile, ApiError> {
        let client = self.client.clone();
        self.client
            .cache()
            .refetch(PROFILE_KEY, &[Tag::Profile], async move {
                client.get(PROFILE_KEY).await
            })
            .await
    }

    /// `PUT user/me` — partial patch, invalidates `User`.
    pub async fn update_user(
        &self,
        update: &UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let user: User = self.client.put(USER_KEY, update).await?;
        self.client.cache().invalidate(Tag::User).await;
        Ok(user)
    }

    /// `PUT user/profile` — partial patch, invalidates `Profile`.
    pub async fn update_profile(
        &self,
        update: &UpdateProfileRequest,
    ) -> Result<Profile, ApiError> {
        let profile: Profile =
            self.client.put(PROFILE_KEY, update).await?;
        self.client.cache().invalidate(Tag::Profile).await;
        Ok(profile)
    }

    /// `DELETE user/profile` — soft delete, invalidates `Profile`.
    pub async fn delete_profile(&self) -> Result<ApiMessage, ApiError> {
        let message: ApiMessage = self.client.delete(PROFILE_KEY).await?;
        self.client.cache().invalidate(Tag::Profile).await;
        Ok(message)
    }

    /// `POST user/profile/restore` — undoes the soft delete, invalidates
    /// `Profile`.
    pub async fn restore_profile(&self) -> Result<ApiMessage, ApiError> {
        let message: ApiMessage =
            self.client.post_empty("user/profile/restore").await?;
        self.client.cache().invalidate(Tag::Profile).await;
        Ok(message)
    }

    /// `POST user/profile/avatar` — multipart upload of one file under the
    /// `avatar` field, invalidates `Profile`.
    pub async fn upload_avatar(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<AvatarUploadResponse, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.clone());
        let form = Form::new().part("avatar", part);
        let response: AvatarUploadResponse = self
            .client
            .post_multipart("user/profile/avatar", form)
            .await?;
        info!("[UsersApi] uploaded avatar {file_name}");
        self.client.cache().invalidate(Tag::Profile).await;
        Ok(response)
    }

    /// `GET user/profile/avatar/:fileId` — the raw image bytes, uncached.
    pub async fn avatar_bytes(
        &self,
        file_id: i64,
    ) -> Result<Vec<u8>, ApiError> {
        self.client
            .get_bytes(&format!("user/profile/avatar/{file_id}"))
            .await
    }

    /// `DELETE user/profile/avatar/:fileId` — invalidates `Profile`.
    pub async fn delete_avatar(
        &self,
        file_id: i64,
    ) -> Result<ApiMessage, ApiError> {
        let message: ApiMessage = self
            .client
            .delete(&format!("user/profile/avatar/{file_id}"))
            .await?;
        self.client.cache().invalidate(Tag::Profile).await;
        Ok(message)
    }

    /// `POST user/profile/avatar/:fileId/refresh-url` — re-signs the
    /// avatar URL, optionally with a custom expiry in seconds. Invalidates
    /// `Profile`.
    pub async fn refresh_avatar_url(
        &self,
        file_id: i64,
        expiry: Option<u64>,
    ) -> Result<AvatarUploadResponse, ApiError> {
        let path = match expiry {
            Some(expiry) => format!(
                "user/profile/avatar/{file_id}/refresh-url?expiry={expiry}"
            ),
            None => format!("user/profile/avatar/{file_id}/refresh-url"),
        };
        let response: AvatarUploadResponse =
            self.client.post_empty(&path).await?;
        self.client.cache().invalidate(Tag::Profile).await;
        Ok(response)
    }
}
