//! Login flow
//!
//! A token is only stored after `GET /users/me` accepted it.

use it_auth::{ApiToken, CredentialSource, Credentials, Session, SessionStore};
use it_core::{Id, ItError, ItResult};
use it_models::User;

use crate::gateway::TrackerGateway;

/// Who the client is acting as
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// `None` when anonymous
    pub user: Option<User>,
    pub source: Option<CredentialSource>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user: None,
            source: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}

/// Verify `token` and persist it as the session
///
/// `gateway` must already send `token`. When `expected_user_id` is given the
/// token has to belong to that user.
pub async fn login(
    gateway: &dyn TrackerGateway,
    store: &dyn SessionStore,
    token: ApiToken,
    expected_user_id: Option<Id>,
) -> ItResult<(Session, User)> {
    let user = gateway.current_user().await?;

    if let Some(expected) = expected_user_id {
        if expected != user.id {
            tracing::warn!(
                expected,
                actual = user.id,
                token = %token.fingerprint(),
                "Token belongs to a different user"
            );
            return Err(ItError::Unauthorized {
                message: format!("token belongs to user {}, not {}", user.id, expected),
            });
        }
    }

    let session = Session::new(user.id, token);
    store.save(&session)?;
    tracing::info!(user_id = user.id, token = %session.token.fingerprint(), "Logged in");
    Ok((session, user))
}

/// Forget the stored session; returns whether there was one
pub fn logout(store: &dyn SessionStore) -> ItResult<bool> {
    let removed = store.clear()?;
    if removed {
        tracing::info!("Logged out");
    }
    Ok(removed)
}

/// Resolve the current identity against the API
pub async fn whoami(
    gateway: &dyn TrackerGateway,
    credentials: Option<&Credentials>,
) -> ItResult<Identity> {
    let Some(credentials) = credentials else {
        return Ok(Identity::anonymous());
    };

    let user = gateway.current_user().await?;
    if let Some(session_user) = credentials.user_id {
        if session_user != user.id {
            tracing::warn!(session_user, actual = user.id, "Stored session user differs from token owner");
        }
    }
    Ok(Identity {
        user: Some(user),
        source: Some(credentials.source),
    })
}
