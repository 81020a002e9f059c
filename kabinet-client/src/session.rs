//! Persisted session slot.
//!
//! One JSON file under the platform data dir holds the bearer token plus
//! the user snapshot captured at login. The snapshot is not kept in sync
//! with later profile edits; it only exists so the CLI can greet the user
//! before the first fetch completes. No expiry check happens client-side —
//! a stale token fails when the server rejects it.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use kabinet_model::User;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SESSION_FILE: &str = "session.json";

/// Errors from the session file.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unable to determine the data directory")]
    NoDataDir,

    #[error("failed to access the session file")]
    Io(#[from] std::io::Error),

    #[error("failed to encode the session")]
    Encode(#[from] serde_json::Error),
}

/// What gets written at login and cleared at logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub user: User,
    pub stored_at: DateTime<Utc>,
}

/// File-backed store for the single session slot.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self, SessionError> {
        let dirs = ProjectDirs::from("", "", "kabinet")
            .ok_or(SessionError::NoDataDir)?;
        Ok(Self {
            path: dirs.data_dir().join(SESSION_FILE),
        })
    }

    /// Store backed by an explicit path, used by tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the stored session, if any. A file that fails to parse is
    /// treated as absent.
    pub fn load(&self) -> Option<StoredSession> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                debug!("[SessionStore] ignoring unreadable session: {err}");
                None
            }
        }
    }

    pub fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        debug!("[SessionStore] session saved for {}", session.user.username);
        Ok(())
    }

    /// Remove the session file. Clearing an already-empty slot is fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        User {
            id: 1,
            username: "ivan".to_string(),
            email: "ivan@example.com".to_string(),
            phone: None,
            is_active: true,
            created_at: at,
            updated_at: at,
            profile: None,
        }
    }

    #[test]
    fn save_load_clear_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::with_path(dir.path().join("session.json"));

        assert!(store.load().is_none());

        let session = StoredSession {
            access_token: "tok-123".to_string(),
            user: sample_user(),
            stored_at: Utc::now(),
        };
        store.save(&session).expect("save session");

        let loaded = store.load().expect("load session");
        assert_eq!(loaded.access_token, "tok-123");
        assert_eq!(loaded.user.username, "ivan");

        store.clear().expect("clear session");
        assert!(store.load().is_none());
        // Clearing twice must not fail.
        store.clear().expect("clear empty slot");
    }

    #[test]
    fn corrupt_session_file_reads_as_absent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").expect("write garbage");

        let store = SessionStore::with_path(path);
        assert!(store.load().is_none());
    }
}
