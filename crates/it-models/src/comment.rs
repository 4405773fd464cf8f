//! Comment model

use chrono::{DateTime, Utc};
use it_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

/// A comment left on an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Id,

    /// Author
    #[serde(default)]
    pub user_id: Option<Id>,

    #[serde(default, alias = "content")]
    pub body: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identifiable for Comment {
    fn id(&self) -> Id {
        self.id
    }
}
