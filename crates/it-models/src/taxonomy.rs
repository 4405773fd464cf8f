//! Taxonomy models
//!
//! Types, severities, priorities and statuses share one shape on the wire:
//! `{ "id": 1, "name": "Bug", "color": "#e74c3c" }`. Statuses additionally
//! carry `is_closed`.

use it_core::traits::{Id, Identifiable, Labeled};
use it_core::types::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four taxonomy families an issue is classified by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyKind {
    Type,
    Severity,
    Priority,
    Status,
}

impl TaxonomyKind {
    pub const ALL: [TaxonomyKind; 4] = [
        TaxonomyKind::Type,
        TaxonomyKind::Severity,
        TaxonomyKind::Priority,
        TaxonomyKind::Status,
    ];

    /// Collection path on the REST API
    pub fn path(&self) -> &'static str {
        match self {
            Self::Type => "/types",
            Self::Severity => "/severities",
            Self::Priority => "/priorities",
            Self::Status => "/statuses",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Severity => "severity",
            Self::Priority => "priority",
            Self::Status => "status",
        }
    }

    /// Human-readable plural caption
    pub fn caption(&self) -> &'static str {
        match self {
            Self::Type => "Types",
            Self::Severity => "Severities",
            Self::Priority => "Priorities",
            Self::Status => "Statuses",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxonomyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "type" | "types" | "issue_type" => Ok(Self::Type),
            "severity" | "severities" => Ok(Self::Severity),
            "priority" | "priorities" => Ok(Self::Priority),
            "status" | "statuses" => Ok(Self::Status),
            other => Err(format!("unknown taxonomy kind: {}", other)),
        }
    }
}

/// A named, colored label applied to issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub id: Id,

    pub name: String,

    /// Display color; may be missing or malformed on legacy rows
    #[serde(default)]
    pub color: Option<Color>,

    /// Only meaningful for statuses
    #[serde(default)]
    pub is_closed: bool,
}

impl TaxonomyEntry {
    pub fn new(id: Id, name: impl Into<String>, color: impl Into<Color>) -> Self {
        Self {
            id,
            name: name.into(),
            color: Some(color.into()),
            is_closed: false,
        }
    }
}

impl Identifiable for TaxonomyEntry {
    fn id(&self) -> Id {
        self.id
    }
}

impl Labeled for TaxonomyEntry {
    fn label(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

/// The four taxonomy lists fetched to populate filters and badges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Taxonomies {
    pub types: Vec<TaxonomyEntry>,
    pub severities: Vec<TaxonomyEntry>,
    pub priorities: Vec<TaxonomyEntry>,
    pub statuses: Vec<TaxonomyEntry>,
}

impl Taxonomies {
    pub fn get(&self, kind: TaxonomyKind) -> &[TaxonomyEntry] {
        match kind {
            TaxonomyKind::Type => &self.types,
            TaxonomyKind::Severity => &self.severities,
            TaxonomyKind::Priority => &self.priorities,
            TaxonomyKind::Status => &self.statuses,
        }
    }

    pub fn set(&mut self, kind: TaxonomyKind, entries: Vec<TaxonomyEntry>) {
        match kind {
            TaxonomyKind::Type => self.types = entries,
            TaxonomyKind::Severity => self.severities = entries,
            TaxonomyKind::Priority => self.priorities = entries,
            TaxonomyKind::Status => self.statuses = entries,
        }
    }

    /// Look up an entry by kind and id
    pub fn find(&self, kind: TaxonomyKind, id: Id) -> Option<&TaxonomyEntry> {
        it_core::traits::find_by_id(self.get(kind), id)
    }
}
