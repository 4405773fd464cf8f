//! Issue model
//!
//! Issues arrive from `GET /issues` with their taxonomy entries embedded.
//! Everything except `id` and `title` is optional on the wire; legacy rows
//! routinely omit severities or carry a null description.

use chrono::{DateTime, NaiveDate, Utc};
use it_core::traits::{Id, Identifiable, Timestamped};
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::comment::Comment;
use crate::taxonomy::{TaxonomyEntry, TaxonomyKind};

/// Issue description
///
/// Older records store the body as a bare string, newer ones as a rich-text
/// object `{ "body": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Plain(String),
    Rich {
        #[serde(default)]
        body: Option<String>,
    },
}

impl Description {
    pub fn text(&self) -> Option<&str> {
        match self {
            Description::Plain(s) => Some(s.as_str()),
            Description::Rich { body } => body.as_deref(),
        }
        .filter(|s| !s.trim().is_empty())
    }
}

/// A tracked issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: Id,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: Option<Description>,

    #[serde(default)]
    pub issue_type: Option<TaxonomyEntry>,
    #[serde(default)]
    pub severity: Option<TaxonomyEntry>,
    #[serde(default)]
    pub priority: Option<TaxonomyEntry>,
    #[serde(default)]
    pub status: Option<TaxonomyEntry>,

    /// Assignee user id; `None` means unassigned
    #[serde(default)]
    pub assigned_to_id: Option<Id>,

    /// Creator user id
    #[serde(default)]
    pub user_id: Option<Id>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date_reason: Option<String>,

    #[serde(default)]
    pub blocked: bool,

    #[serde(default)]
    pub attachments: Vec<Attachment>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn new(id: Id, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            issue_type: None,
            severity: None,
            priority: None,
            status: None,
            assigned_to_id: None,
            user_id: None,
            due_date: None,
            due_date_reason: None,
            blocked: false,
            attachments: Vec::new(),
            comments: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Taxonomy entry for the given family
    pub fn taxonomy(&self, kind: TaxonomyKind) -> Option<&TaxonomyEntry> {
        match kind {
            TaxonomyKind::Type => self.issue_type.as_ref(),
            TaxonomyKind::Severity => self.severity.as_ref(),
            TaxonomyKind::Priority => self.priority.as_ref(),
            TaxonomyKind::Status => self.status.as_ref(),
        }
    }

    pub fn with_taxonomy(mut self, kind: TaxonomyKind, entry: TaxonomyEntry) -> Self {
        let slot = match kind {
            TaxonomyKind::Type => &mut self.issue_type,
            TaxonomyKind::Severity => &mut self.severity,
            TaxonomyKind::Priority => &mut self.priority,
            TaxonomyKind::Status => &mut self.status,
        };
        *slot = Some(entry);
        self
    }

    pub fn assigned_to(mut self, user_id: Id) -> Self {
        self.assigned_to_id = Some(user_id);
        self
    }

    pub fn updated(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    pub fn is_unassigned(&self) -> bool {
        self.assigned_to_id.is_none()
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_ref().and_then(Description::text)
    }

    /// Closed when the status says so
    pub fn is_closed(&self) -> bool {
        self.status.as_ref().map(|s| s.is_closed).unwrap_or(false)
    }
}

impl Identifiable for Issue {
    fn id(&self) -> Id {
        self.id
    }
}

impl Timestamped for Issue {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
