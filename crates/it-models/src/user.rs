//! User model

use chrono::{DateTime, Utc};
use it_core::traits::{Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};

/// User account as returned by `GET /users` and `GET /users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,

    /// Login handle
    #[serde(default)]
    pub username: String,

    /// Full name; older accounts may only have a username
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,

    #[serde(default)]
    pub bio: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(id: Id, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            name: None,
            email: None,
            avatar_url: None,
            bio: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for display: full name, falling back to the username
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.username,
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for User {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
