//! Aggregate view-model over the two fetches and the mutations a profile
//! screen consumes.
//!
//! Every mutation goes through one generic `perform` step: set busy, clear
//! the local error, run the call, refetch the related read on success,
//! record a localized message on failure, clear busy regardless, and hand
//! the original result back to the caller.

use std::future::Future;

use chrono::{DateTime, NaiveDate};
use kabinet_model::{
    ApiMessage, AvatarUploadResponse, Profile, UpdateProfileRequest,
    UpdateUserRequest, User,
};
use log::debug;

use crate::auth_api::AuthApi;
use crate::error::ApiError;
use crate::users_api::UsersApi;

/// Shown when neither profile names nor a username resolve to anything.
pub const FALLBACK_NAME: &str = "Пользователь";

const UPDATE_USER_FALLBACK: &str = "Ошибка при обновлении пользователя";
const UPDATE_PROFILE_FALLBACK: &str = "Ошибка при обновлении профиля";
const UPLOAD_AVATAR_FALLBACK: &str = "Ошибка при загрузке аватара";
const DELETE_AVATAR_FALLBACK: &str = "Ошибка при удалении аватара";
const REFRESH_AVATAR_FALLBACK: &str = "Ошибка при обновлении URL аватара";
const DELETE_PROFILE_FALLBACK: &str = "Ошибка при удалении профиля";
const RESTORE_PROFILE_FALLBACK: &str = "Ошибка при восстановлении профиля";

/// Which read a successful mutation refreshes.
#[derive(Debug, Clone, Copy)]
enum Refetch {
    User,
    Profile,
}

/// Read/write façade over the auth and user/profile groups.
#[derive(Debug)]
pub struct ProfileViewModel {
    auth: AuthApi,
    users: UsersApi,
    user: Option<User>,
    profile: Option<Profile>,
    busy: bool,
    error: Option<String>,
    user_error: Option<String>,
    profile_error: Option<String>,
}

impl ProfileViewModel {
    pub fn new(auth: AuthApi, users: UsersApi) -> Self {
        Self {
            auth,
            users,
            user: None,
            profile: None,
            busy: false,
            error: None,
            user_error: None,
            profile_error: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn users(&self) -> &UsersApi {
        &self.users
    }

    /// True while any operation on this view-model is in flight.
    pub fn is_loading(&self) -> bool {
        self.busy
    }

    /// First error in precedence order: local mutation error, then the
    /// user fetch, then the profile fetch.
    pub fn error(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.user_error.as_deref())
            .or(self.profile_error.as_deref())
    }

    /// True when both initial reads failed and there is nothing to render.
    pub fn is_empty_failure(&self) -> bool {
        self.user.is_none()
            && self.profile.is_none()
            && (self.user_error.is_some() || self.profile_error.is_some())
    }

    /// Fetch user and profile through the cache. The two reads are
    /// independent; either may fail without taking the other down, and
    /// fetch errors are surfaced unlocalized.
    pub async fn load(&mut self) {
        self.busy = true;
        match self.users.current_user().await {
            Ok(user) => {
                self.user = Some(user);
                self.user_error = None;
            }
            Err(err) => {
                debug!("[ProfileViewModel] user fetch failed: {err}");
                self.user_error = Some(err.to_string());
            }
        }
        match self.users.profile().await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.profile_error = None;
            }
            Err(err) => {
                debug!("[ProfileViewModel] profile fetch failed: {err}");
                self.profile_error = Some(err.to_string());
            }
        }
        self.busy = false;
    }

    pub async fn update_user(
        &mut self,
        update: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let users = self.users.clone();
        self.perform(UPDATE_USER_FALLBACK, Refetch::User, async move {
            users.update_user(&update).await
        })
        .await
    }

    pub async fn update_profile(
        &mut self,
        update: UpdateProfileRequest,
    ) -> Result<Profile, ApiError> {
        let users = self.users.clone();
        self.perform(UPDATE_PROFILE_FALLBACK, Refetch::Profile, async move {
            users.update_profile(&update).await
        })
        .await
    }

    pub async fn upload_avatar(
        &mut self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<AvatarUploadResponse, ApiError> {
        let users = self.users.clone();
        self.perform(UPLOAD_AVATAR_FALLBACK, Refetch::Profile, async move {
            users.upload_avatar(file_name, bytes).await
        })
        .await
    }

    pub async fn delete_avatar(
        &mut self,
        file_id: i64,
    ) -> Result<ApiMessage, ApiError> {
        let users = self.users.clone();
        self.perform(DELETE_AVATAR_FALLBACK, Refetch::Profile, async move {
            users.delete_avatar(file_id).await
        })
        .await
    }

    pub async fn refresh_avatar_url(
        &mut self,
        file_id: i64,
        expiry: Option<u64>,
    ) -> Result<AvatarUploadResponse, ApiError> {
        let users = self.users.clone();
        self.perform(REFRESH_AVATAR_FALLBACK, Refetch::Profile, async move {
            users.refresh_avatar_url(file_id, expiry).await
        })
        .await
    }

    pub async fn delete_profile(&mut self) -> Result<ApiMessage, ApiError> {
        let users = self.users.clone();
        self.perform(DELETE_PROFILE_FALLBACK, Refetch::Profile, async move {
            users.delete_profile().await
        })
        .await
    }

    pub async fn restore_profile(&mut self) -> Result<ApiMessage, ApiError> {
        let users = self.users.clone();
        self.perform(RESTORE_PROFILE_FALLBACK, Refetch::Profile, async move {
            users.restore_profile().await
        })
        .await
    }

    /// The shared mutation wrapper. Busy clears in the final step no
    /// matter how the call went; the caller still receives the original
    /// result.
    async fn perform<T, F>(
        &mut self,
        fallback: &str,
        refetch: Refetch,
        op: F,
    ) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.busy = true;
        self.error = None;

        let result = op.await;
        match &result {
            Ok(_) => match refetch {
                Refetch::User => match self.users.refetch_user().await {
                    Ok(user) => {
                        self.user = Some(user);
                        self.user_error = None;
                    }
                    Err(err) => self.user_error = Some(err.to_string()),
                },
                Refetch::Profile => match self.users.refetch_profile().await
                {
                    Ok(profile) => {
                        self.profile = Some(profile);
                        self.profile_error = None;
                    }
                    Err(err) => self.profile_error = Some(err.to_string()),
                },
            },
            Err(err) => {
                self.error = Some(localized_message(err, fallback));
            }
        }

        self.busy = false;
        result
    }

    pub fn full_name(&self) -> String {
        full_name(self.user.as_ref(), self.profile.as_ref())
    }

    pub fn initials(&self) -> String {
        initials(&self.full_name())
    }

    pub fn has_avatar(&self) -> bool {
        has_avatar(self.profile.as_ref())
    }
}

/// Server message when the error carries one, fixed fallback otherwise.
fn localized_message(err: &ApiError, fallback: &str) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

/// Display name: "first last" when both are set, falling through
/// first-only, last-only, username, then the literal fallback.
pub fn full_name(user: Option<&User>, profile: Option<&Profile>) -> String {
    let username = || {
        user.map(|u| u.username.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string()
    };

    let Some(profile) = profile else {
        return username();
    };

    let first = profile.first_name.as_deref().unwrap_or("");
    let last = profile.last_name.as_deref().unwrap_or("");
    if !first.is_empty() && !last.is_empty() {
        format!("{first} {last}")
    } else if !first.is_empty() {
        first.to_string()
    } else if !last.is_empty() {
        last.to_string()
    } else {
        username()
    }
}

/// Two uppercase initials for a two-token name, one for a single token,
/// "U" when nothing resolves.
pub fn initials(full_name: &str) -> String {
    fn initial(token: &str) -> Option<String> {
        token.chars().next().map(|c| c.to_uppercase().collect())
    }

    let mut tokens = full_name.split_whitespace();
    let first = tokens.next().and_then(initial);
    let second = tokens.next().and_then(initial);
    match (first, second) {
        (Some(a), Some(b)) => format!("{a}{b}"),
        (Some(a), None) => a,
        _ => "U".to_string(),
    }
}

/// True only for a non-empty, non-whitespace avatar URL.
pub fn has_avatar(profile: Option<&Profile>) -> bool {
    profile
        .and_then(|p| p.avatar.as_deref())
        .map(|avatar| !avatar.trim().is_empty())
        .unwrap_or(false)
}

/// Format an ISO timestamp (or plain `YYYY-MM-DD` date) as `dd.mm.yyyy`.
/// Missing or unparseable input renders as the empty string.
pub fn format_date(iso: Option<&str>) -> String {
    let Some(raw) = iso else {
        return String::new();
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d.%m.%Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%d.%m.%Y").to_string();
    }
    String::new()
}

/// Birth dates render exactly like any other calendar date.
pub fn format_birth_date(iso: Option<&str>) -> String {
    format_date(iso)
}
