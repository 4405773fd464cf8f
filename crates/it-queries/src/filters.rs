//! Issue Filters
//!
//! Filters are per-dimension selections of identifiers plus a free-text
//! search. Selections only change through [`FilterState::toggle`], so an id
//! can never appear twice in the same dimension.

use it_core::traits::Id;
use it_models::TaxonomyKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Filterable issue attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Type,
    Severity,
    Priority,
    Status,
    /// Assigned user
    Assignee,
    /// Reporting user
    Creator,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 6] = [
        FilterDimension::Type,
        FilterDimension::Severity,
        FilterDimension::Priority,
        FilterDimension::Status,
        FilterDimension::Assignee,
        FilterDimension::Creator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Severity => "severity",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Assignee => "assignee",
            Self::Creator => "creator",
        }
    }

    /// Query parameter carrying this dimension's selection
    pub fn param_name(&self) -> &'static str {
        match self {
            Self::Type => "filter_type[]",
            Self::Severity => "filter_severity[]",
            Self::Priority => "filter_priority[]",
            Self::Status => "filter_status[]",
            Self::Assignee => "filter_assignee[]",
            Self::Creator => "filter_creator[]",
        }
    }

    /// Taxonomy backing this dimension; `None` for the user dimensions
    pub fn taxonomy(&self) -> Option<TaxonomyKind> {
        match self {
            Self::Type => Some(TaxonomyKind::Type),
            Self::Severity => Some(TaxonomyKind::Severity),
            Self::Priority => Some(TaxonomyKind::Priority),
            Self::Status => Some(TaxonomyKind::Status),
            Self::Assignee | Self::Creator => None,
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "type" | "types" => Ok(Self::Type),
            "severity" => Ok(Self::Severity),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "assignee" | "assigned_to" => Ok(Self::Assignee),
            "creator" | "created_by" | "author" => Ok(Self::Creator),
            other => Err(format!("unknown filter dimension: {}", other)),
        }
    }
}

/// Current filter selections and search text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Selected ids per dimension, in the order they were toggled on
    selections: BTreeMap<FilterDimension, Vec<Id>>,
    /// Free-text search; sent only when non-empty
    search: String,
    /// Keep only issues without an assignee (applied locally)
    unassigned: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` to the dimension if absent, remove it if present
    ///
    /// Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, dimension: FilterDimension, id: Id) -> bool {
        let selected = self.selections.entry(dimension).or_default();
        let now_selected = match selected.iter().position(|v| *v == id) {
            Some(pos) => {
                selected.remove(pos);
                false
            }
            None => {
                selected.push(id);
                true
            }
        };
        if selected.is_empty() {
            self.selections.remove(&dimension);
        }
        now_selected
    }

    /// Builder form of [`toggle`](Self::toggle)
    pub fn with(mut self, dimension: FilterDimension, id: Id) -> Self {
        self.toggle(dimension, id);
        self
    }

    /// Selected ids for a dimension, in selection order
    pub fn selected(&self, dimension: FilterDimension) -> &[Id] {
        self.selections
            .get(&dimension)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_selected(&self, dimension: FilterDimension, id: Id) -> bool {
        self.selected(dimension).contains(&id)
    }

    /// Dimensions with a non-empty selection, in declaration order
    pub fn active_dimensions(&self) -> impl Iterator<Item = (FilterDimension, &[Id])> {
        self.selections
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(dimension, ids)| (*dimension, ids.as_slice()))
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_unassigned(&mut self, unassigned: bool) {
        self.unassigned = unassigned;
    }

    pub fn unassigned(&self) -> bool {
        self.unassigned
    }

    /// Drop all selections, the search text and the unassigned flag
    pub fn clear(&mut self) {
        self.selections.clear();
        self.search.clear();
        self.unassigned = false;
    }

    /// Whether any dimension or the unassigned flag is active
    ///
    /// Search text does not count; it has its own input.
    pub fn has_active_filters(&self) -> bool {
        self.unassigned || self.selections.values().any(|ids| !ids.is_empty())
    }
}
