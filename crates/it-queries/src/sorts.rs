//! Issue Sort State
//!
//! A single active sort column and direction. Header clicks drive it: the
//! active column flips direction, any other column takes over ascending.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Header indicator glyph
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// Columns the issue list can be sorted by
///
/// The wire names are what `GET /issues` expects in its `sort` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Type,
    Severity,
    Priority,
    Status,
    UpdatedAt,
    AssignedToId,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Title,
        SortField::Type,
        SortField::Severity,
        SortField::Priority,
        SortField::Status,
        SortField::UpdatedAt,
        SortField::AssignedToId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Type => "type",
            Self::Severity => "severity",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::UpdatedAt => "updated_at",
            Self::AssignedToId => "assigned_to_id",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "type" | "issue_type" => Ok(Self::Type),
            "severity" => Ok(Self::Severity),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "updated_at" | "updated" => Ok(Self::UpdatedAt),
            "assigned_to_id" | "assignee" => Ok(Self::AssignedToId),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

/// The active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Most recently updated first
    fn default() -> Self {
        Self {
            field: SortField::UpdatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Apply a header click
    ///
    /// Only an ascending sort on the same field turns descending; everything
    /// else lands on ascending.
    pub fn sort_by(&mut self, field: SortField) {
        self.direction = if self.field == field && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.field = field;
    }

    /// Direction if `field` is the active column
    pub fn direction_for(&self, field: SortField) -> Option<SortDirection> {
        (self.field == field).then_some(self.direction)
    }
}
