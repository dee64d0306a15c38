//! Persisted login session
//!
//! The session holds the bearer token, the signed-in user and the theme
//! preference. It survives restarts through a small JSON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use spendboard_config::Theme;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Session {
    /// Both a token and a user id are present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user_id.is_some()
    }

    /// Greeting name, falling back to "User"
    pub fn display_name(&self) -> &str {
        self.user_name.as_deref().unwrap_or("User")
    }
}

/// Storage for the current session
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Session;

    fn save(&self, session: &Session) -> ApiResult<()>;

    fn token(&self) -> Option<String> {
        self.load().token
    }

    /// Drop only the token, used when the server rejects it
    fn clear_token(&self) -> ApiResult<()> {
        let mut session = self.load();
        session.token = None;
        self.save(&session)
    }

    /// Forget the signed-in user. The theme preference is kept.
    fn clear(&self) -> ApiResult<()> {
        let theme = self.load().theme;
        self.save(&Session {
            theme,
            ..Session::default()
        })
    }
}

/// Session kept in a JSON file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => {
                debug!("no session file at {}", self.path.display());
                return Session::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!("ignoring unreadable session file {}: {}", self.path.display(), e);
                Session::default()
            }
        }
    }

    fn save(&self, session: &Session) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ApiError::Session {
                message: format!("{}: {}", parent.display(), e),
            })?;
        }
        let content = serde_json::to_string_pretty(session).map_err(|e| ApiError::Session {
            message: e.to_string(),
        })?;
        fs::write(&self.path, content).map_err(|e| ApiError::Session {
            message: format!("{}: {}", self.path.display(), e),
        })?;
        debug!("session saved to {}", self.path.display());
        Ok(())
    }
}

/// Session held in memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<Session>,
}

impl MemorySessionStore {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn save(&self, session: &Session) -> ApiResult<()> {
        let mut guard = self.inner.lock().map_err(|_| ApiError::Session {
            message: "session lock poisoned".to_string(),
        })?;
        *guard = session.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn signed_in() -> Session {
        Session {
            token: Some("abc".to_string()),
            user_id: Some(7),
            user_name: Some("Asha".to_string()),
            theme: Some(Theme::Light),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("nested").join("session.json"));

        assert_eq!(store.load(), Session::default());
        store.save(&signed_in()).unwrap();
        assert_eq!(store.load(), signed_in());
        assert_eq!(store.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_store_uses_camel_case_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path().join("session.json"));
        store.save(&signed_in()).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"userId\": 7"));
        assert!(raw.contains("\"userName\": \"Asha\""));
    }

    #[test]
    fn test_corrupt_file_loads_empty_session() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(FileSessionStore::new(path).load(), Session::default());
    }

    #[test]
    fn test_clear_token_keeps_user() {
        let store = MemorySessionStore::new(signed_in());
        store.clear_token().unwrap();

        let session = store.load();
        assert_eq!(session.token, None);
        assert_eq!(session.user_id, Some(7));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clear_keeps_theme() {
        let store = MemorySessionStore::new(signed_in());
        store.clear().unwrap();

        let session = store.load();
        assert_eq!(session.token, None);
        assert_eq!(session.user_id, None);
        assert_eq!(session.user_name, None);
        assert_eq!(session.theme, Some(Theme::Light));
        assert_eq!(session.display_name(), "User");
    }
}
