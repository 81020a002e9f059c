//! Edit draft: the staging copy of editable user and profile fields.
//!
//! Initialized from fetched data when editing starts, mutated by CLI
//! flags, and only turned into the two partial-patch bodies at submit
//! time. Discarded entirely when the save fails.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kabinet_model::{
    Gender, Profile, UpdateProfileRequest, UpdateUserRequest, User,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("некорректная дата рождения: {0} (ожидается ГГГГ-ММ-ДД)")]
    InvalidBirthDate(String),
}

/// Transient client-side copy of the editable subset of User + Profile.
#[derive(Debug, Clone, Default)]
pub struct EditDraft {
    pub username: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    /// Plain calendar date `YYYY-MM-DD`; empty when unset.
    pub birth_date: String,
    pub gender: Option<Gender>,
}

impl EditDraft {
    /// Stage the current server state for editing.
    pub fn from_state(
        user: Option<&User>,
        profile: Option<&Profile>,
    ) -> Self {
        Self {
            username: user.map(|u| u.username.clone()).unwrap_or_default(),
            phone: user.and_then(|u| u.phone.clone()).unwrap_or_default(),
            first_name: profile
                .and_then(|p| p.first_name.clone())
                .unwrap_or_default(),
            last_name: profile
                .and_then(|p| p.last_name.clone())
                .unwrap_or_default(),
            birth_date: profile
                .and_then(|p| p.birth_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            gender: profile.and_then(|p| p.gender),
        }
    }

    /// User half of the draft. Empty fields are omitted from the patch.
    pub fn user_request(&self) -> UpdateUserRequest {
        UpdateUserRequest {
            username: non_empty(&self.username),
            phone: non_empty(&self.phone),
            is_active: None,
        }
    }

    /// Profile half of the draft. The plain date string becomes a full
    /// UTC timestamp only when non-empty; unset gender stays omitted
    /// rather than being sent as an empty value.
    pub fn profile_request(
        &self,
    ) -> Result<UpdateProfileRequest, DraftError> {
        let birth_date = match self.birth_date.trim() {
            "" => None,
            raw => Some(parse_birth_date(raw)?),
        };
        Ok(UpdateProfileRequest {
            first_name: non_empty(&self.first_name),
            last_name: non_empty(&self.last_name),
            avatar: None,
            birth_date,
            gender: self.gender,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_birth_date(raw: &str) -> Result<DateTime<Utc>, DraftError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DraftError::InvalidBirthDate(raw.to_string()))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}
