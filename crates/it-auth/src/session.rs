//! Session Storage
//!
//! A session is what `it login` leaves behind: the verified user id and the
//! token that proved it. It lives in a small JSON file readable only by its
//! owner.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::token::ApiToken;
use it_core::{Id, ItError};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Could not access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Session file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl From<SessionError> for ItError {
    fn from(err: SessionError) -> Self {
        ItError::Session(err.to_string())
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Verified user id
    pub user_id: Id,
    pub token: ApiToken,
    /// Login time
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Id, token: ApiToken) -> Self {
        Self {
            user_id,
            token,
            created_at: Utc::now(),
        }
    }
}

/// On-disk form; the only place the token leaves its secret wrapper
#[derive(Serialize, Deserialize)]
struct StoredSession {
    user_id: Id,
    token: String,
    created_at: DateTime<Utc>,
}

impl StoredSession {
    fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user_id,
            token: session.token.expose().to_string(),
            created_at: session.created_at,
        }
    }

    fn into_session(self, path: &Path) -> Result<Session, SessionError> {
        let token = ApiToken::new(self.token).map_err(|e| SessionError::Corrupt {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Session {
            user_id: self.user_id,
            token,
            created_at: self.created_at,
        })
    }
}

/// Session store trait for different backends
pub trait SessionStore: Send + Sync {
    /// The stored session, if any
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Replace the stored session
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove the stored session; returns whether one existed
    fn clear(&self) -> Result<bool, SessionError>;
}

/// JSON file session store
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

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let stored: StoredSession =
            serde_json::from_str(&contents).map_err(|e| SessionError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        stored.into_session(&self.path).map(Some)
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_vec_pretty(&StoredSession::from_session(session)).map_err(|e| {
            SessionError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        let mut file = owner_only_options()
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(&json).map_err(|e| self.io_error(e))?;
        restrict_permissions(&self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(
            path = %self.path.display(),
            user_id = session.user_id,
            token = %session.token.fingerprint(),
            "Session saved"
        );
        Ok(())
    }

    fn clear(&self) -> Result<bool, SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(unix)]
fn owner_only_options() -> fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(0o600);
    options
}

#[cfg(not(unix))]
fn owner_only_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    options
}

/// Tighten an existing file that was created with looser permissions
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-memory session store (for testing)
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.lock().clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<bool, SessionError> {
        Ok(self.session.lock().take().is_some())
    }
}
