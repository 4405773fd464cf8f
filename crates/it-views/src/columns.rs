//! Issue list columns
//!
//! Columns define which attributes the issue list shows and which headers
//! are clickable for sorting.

use it_models::TaxonomyKind;
use it_queries::SortField;

/// How a column's cells are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `#<id>`
    Id,
    Title,
    /// Colored taxonomy badge
    Badge(TaxonomyKind),
    /// Last update timestamp
    UpdatedAt,
    /// Resolved assignee name
    Assignee,
}

/// A list column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column identifier
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Header caption
    pub caption: &'static str,
    /// Sort field requested on a header click; `None` for fixed columns
    pub sort_field: Option<SortField>,
}

impl Column {
    pub fn new(name: &'static str, kind: ColumnKind, caption: &'static str) -> Self {
        Self {
            name,
            kind,
            caption,
            sort_field: None,
        }
    }

    pub fn sortable_by(mut self, field: SortField) -> Self {
        self.sort_field = Some(field);
        self
    }

    pub fn is_sortable(&self) -> bool {
        self.sort_field.is_some()
    }
}

/// Standard issue list columns
pub mod standard {
    use super::*;

    pub fn id() -> Column {
        Column::new("id", ColumnKind::Id, "ID")
    }

    pub fn title() -> Column {
        Column::new("title", ColumnKind::Title, "Title").sortable_by(SortField::Title)
    }

    pub fn issue_type() -> Column {
        Column::new("type", ColumnKind::Badge(TaxonomyKind::Type), "Type")
            .sortable_by(SortField::Type)
    }

    pub fn severity() -> Column {
        Column::new("severity", ColumnKind::Badge(TaxonomyKind::Severity), "Severity")
            .sortable_by(SortField::Severity)
    }

    pub fn priority() -> Column {
        Column::new("priority", ColumnKind::Badge(TaxonomyKind::Priority), "Priority")
            .sortable_by(SortField::Priority)
    }

    pub fn status() -> Column {
        Column::new("status", ColumnKind::Badge(TaxonomyKind::Status), "Status")
            .sortable_by(SortField::Status)
    }

    pub fn updated_at() -> Column {
        Column::new("updated_at", ColumnKind::UpdatedAt, "Updated")
            .sortable_by(SortField::UpdatedAt)
    }

    pub fn assignee() -> Column {
        Column::new("assignee", ColumnKind::Assignee, "Assignee")
            .sortable_by(SortField::AssignedToId)
    }
}

/// Ordered set of columns
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self { columns: vec![] }
    }

    /// Every standard column, in list order
    pub fn default_issue_list() -> Self {
        Self {
            columns: vec![
                standard::id(),
                standard::title(),
                standard::issue_type(),
                standard::severity(),
                standard::priority(),
                standard::status(),
                standard::updated_at(),
                standard::assignee(),
            ],
        }
    }

    /// Add a column (builder pattern)
    pub fn with(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the column a header click on `field` would hit
    pub fn position_of(&self, field: SortField) -> Option<usize> {
        self.columns.iter().position(|c| c.sort_field == Some(field))
    }
}
