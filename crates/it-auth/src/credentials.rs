//! Credential resolution
//!
//! Precedence: an explicitly configured token (`ISSUETRACK_API_TOKEN` or the
//! config file), then the stored session, then anonymous.

use it_core::{Id, ItResult};

use crate::session::SessionStore;
use crate::token::ApiToken;

/// Where the active token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Environment variable or config file
    Configured,
    /// Session saved by `it login`
    Session,
}

impl CredentialSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configured => "configured",
            Self::Session => "session",
        }
    }
}

/// Credentials attached to outgoing requests
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub token: ApiToken,
    /// Known only for session credentials
    pub user_id: Option<Id>,
    pub source: CredentialSource,
}

impl Credentials {
    pub fn configured(token: ApiToken) -> Self {
        Self {
            token,
            user_id: None,
            source: CredentialSource::Configured,
        }
    }
}

/// Pick the credentials for this run; `None` means anonymous
pub fn resolve(
    configured_token: Option<&str>,
    store: &dyn SessionStore,
) -> ItResult<Option<Credentials>> {
    if let Some(raw) = configured_token {
        let token = ApiToken::new(raw)?;
        tracing::debug!(token = %token.fingerprint(), "Using configured API token");
        return Ok(Some(Credentials::configured(token)));
    }

    match store.load()? {
        Some(session) => {
            tracing::debug!(
                user_id = session.user_id,
                token = %session.token.fingerprint(),
                "Using stored session"
            );
            Ok(Some(Credentials {
                token: session.token,
                user_id: Some(session.user_id),
                source: CredentialSource::Session,
            }))
        }
        None => {
            tracing::debug!("No credentials, continuing anonymously");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, Session};

    fn stored(user_id: Id, token: &str) -> MemorySessionStore {
        MemorySessionStore::with_session(Session::new(user_id, ApiToken::new(token).unwrap()))
    }

    #[test]
    fn test_configured_token_wins() {
        let store = stored(2, "from-session");
        let creds = resolve(Some("from-env"), &store).unwrap().unwrap();
        assert_eq!(creds.source, CredentialSource::Configured);
        assert_eq!(creds.token.expose(), "from-env");
        assert_eq!(creds.user_id, None);
    }

    #[test]
    fn test_session_used_when_nothing_configured() {
        let store = stored(2, "from-session");
        let creds = resolve(None, &store).unwrap().unwrap();
        assert_eq!(creds.source, CredentialSource::Session);
        assert_eq!(creds.user_id, Some(2));
    }

    #[test]
    fn test_anonymous_without_credentials() {
        let store = MemorySessionStore::new();
        assert!(resolve(None, &store).unwrap().is_none());
    }

    #[test]
    fn test_blank_configured_token_is_an_error() {
        let store = MemorySessionStore::new();
        assert!(resolve(Some("  "), &store).is_err());
    }
}
