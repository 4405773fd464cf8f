//! Issue list view
//!
//! Turns an ordered slice of issues into a backend-neutral table. The view
//! keeps the order it is given and never acts on clicks itself: row and
//! header clicks are forwarded to a [`ListEvents`] implementation.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use it_core::{Color, Id};
use it_models::{Issue, Labeled, TaxonomyEntry, User};
use it_queries::{local, SortDirection, SortField, SortState};

use crate::columns::{Column, ColumnKind, ColumnSet};

/// Placeholder shown instead of a table for an empty list
pub const NO_RESULTS: &str = "No issues found";

/// Default timestamp format for the updated column
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d %b %H:%M";

/// Callbacks for list interaction
pub trait ListEvents {
    fn issue_selected(&mut self, id: Id);
    fn sort_requested(&mut self, field: SortField);
}

/// A colored label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: Option<Color>,
}

impl Badge {
    fn from_entry(entry: &TaxonomyEntry) -> Self {
        Self {
            label: entry.label().to_string(),
            color: entry.color().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Badge(Badge),
    Empty,
}

impl Cell {
    /// Text content without any styling
    pub fn plain(&self) -> &str {
        match self {
            Cell::Text(text) => text,
            Cell::Badge(badge) => &badge.label,
            Cell::Empty => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub caption: &'static str,
    pub sort_field: Option<SortField>,
    /// Set on the active sort column only
    pub indicator: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    pub issue_id: Id,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<IssueRow>,
}

/// Render output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedList {
    Placeholder(String),
    Table(IssueTable),
}

impl RenderedList {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderedList::Placeholder(_))
    }

    pub fn table(&self) -> Option<&IssueTable> {
        match self {
            RenderedList::Table(table) => Some(table),
            RenderedList::Placeholder(_) => None,
        }
    }
}

/// Stateless view over one issue sequence
pub struct IssueListView<'a> {
    issues: &'a [Issue],
    users: &'a [User],
    sort: Option<SortState>,
    columns: ColumnSet,
    timestamp_format: String,
}

impl<'a> IssueListView<'a> {
    pub fn new(issues: &'a [Issue]) -> Self {
        Self {
            issues,
            users: &[],
            sort: None,
            columns: ColumnSet::default_issue_list(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Users for resolving assignee names
    pub fn with_users(mut self, users: &'a [User]) -> Self {
        self.users = users;
        self
    }

    /// Sort state to show as header indicator
    pub fn with_sort(mut self, sort: SortState) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn render(&self) -> RenderedList {
        if self.issues.is_empty() {
            return RenderedList::Placeholder(NO_RESULTS.to_string());
        }

        let headers = self
            .columns
            .columns()
            .iter()
            .map(|column| HeaderCell {
                caption: column.caption,
                sort_field: column.sort_field,
                indicator: match (column.sort_field, self.sort) {
                    (Some(field), Some(sort)) => sort.direction_for(field),
                    _ => None,
                },
            })
            .collect();

        let rows = self
            .issues
            .iter()
            .map(|issue| IssueRow {
                issue_id: issue.id,
                cells: self
                    .columns
                    .columns()
                    .iter()
                    .map(|column| self.cell(issue, column))
                    .collect(),
            })
            .collect();

        RenderedList::Table(IssueTable { headers, rows })
    }

    /// Forward a click on the row at `index`; false if out of range
    pub fn click_row(&self, index: usize, events: &mut dyn ListEvents) -> bool {
        match self.issues.get(index) {
            Some(issue) => {
                events.issue_selected(issue.id);
                true
            }
            None => false,
        }
    }

    /// Forward a click on the header at `index`; false for fixed columns
    pub fn click_header(&self, index: usize, events: &mut dyn ListEvents) -> bool {
        match self.columns.get(index).and_then(|c| c.sort_field) {
            Some(field) => {
                events.sort_requested(field);
                true
            }
            None => false,
        }
    }

    fn cell(&self, issue: &Issue, column: &Column) -> Cell {
        match column.kind {
            ColumnKind::Id => Cell::Text(format!("#{}", issue.id)),
            ColumnKind::Title => Cell::Text(issue.title.clone()),
            ColumnKind::Badge(kind) => issue
                .taxonomy(kind)
                .map(|entry| Cell::Badge(Badge::from_entry(entry)))
                .unwrap_or(Cell::Empty),
            ColumnKind::UpdatedAt => issue
                .updated_at
                .map(|at| Cell::Text(format_timestamp(at, &self.timestamp_format)))
                .unwrap_or(Cell::Empty),
            ColumnKind::Assignee => match (issue.assigned_to_id, local::assignee_of(issue, self.users)) {
                (_, Some(user)) => Cell::Text(user.display_name().to_string()),
                (Some(id), None) => Cell::Text(format!("user #{}", id)),
                (None, None) => Cell::Empty,
            },
        }
    }
}

/// Format with a user-supplied chrono pattern, falling back to RFC 3339
pub fn format_timestamp(at: DateTime<Utc>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(format)).is_err() {
        return at.to_rfc3339();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use it_models::TaxonomyKind;

    #[derive(Default)]
    struct Recorder {
        selected: Vec<Id>,
        sorts: Vec<SortField>,
    }

    impl ListEvents for Recorder {
        fn issue_selected(&mut self, id: Id) {
            self.selected.push(id);
        }

        fn sort_requested(&mut self, field: SortField) {
            self.sorts.push(field);
        }
    }

    fn issue(id: Id) -> Issue {
        let title: String = Sentence(2..5).fake();
        Issue::new(id, title)
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let rendered = IssueListView::new(&[]).render();
        assert_eq!(rendered, RenderedList::Placeholder(NO_RESULTS.to_string()));
        assert!(rendered.table().is_none());
    }

    #[test]
    fn test_rows_keep_given_order() {
        let issues = vec![issue(5), issue(3)];
        let rendered = IssueListView::new(&issues).render();
        let table = rendered.table().unwrap();

        let ids: Vec<Id> = table.rows.iter().map(|r| r.issue_id).collect();
        assert_eq!(ids, vec![5, 3]);
        assert_eq!(table.rows[0].cells[0].plain(), "#5");
        assert_eq!(table.rows[0].cells[1].plain(), issues[0].title);
    }

    #[test]
    fn test_badges_and_missing_taxonomy() {
        let issues = vec![issue(1)
            .with_taxonomy(TaxonomyKind::Type, TaxonomyEntry::new(2, "Bug", "#e74c3c"))
            .with_taxonomy(TaxonomyKind::Status, TaxonomyEntry::new(1, "Open", "#2ecc71"))];
        let rendered = IssueListView::new(&issues).render();
        let cells = &rendered.table().unwrap().rows[0].cells;

        assert_eq!(
            cells[2],
            Cell::Badge(Badge {
                label: "Bug".into(),
                color: Some(Color::new("#e74c3c")),
            })
        );
        assert_eq!(cells[3], Cell::Empty);
        assert_eq!(cells[5].plain(), "Open");
    }

    #[test]
    fn test_sort_indicator_on_active_column_only() {
        let issues = vec![issue(1)];
        let sort = SortState::new(SortField::Severity, SortDirection::Asc);
        let rendered = IssueListView::new(&issues).with_sort(sort).render();
        let headers = &rendered.table().unwrap().headers;

        let marked: Vec<_> = headers.iter().filter(|h| h.indicator.is_some()).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].caption, "Severity");
        assert_eq!(marked[0].indicator, Some(SortDirection::Asc));
    }

    #[test]
    fn test_assignee_and_timestamp_cells() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        let issues = vec![
            issue(1).assigned_to(4).updated(at),
            issue(2).assigned_to(99),
            issue(3),
        ];
        let users = vec![User::new(4, "ben").with_name("Ben Ortiz")];
        let rendered = IssueListView::new(&issues).with_users(&users).render();
        let rows = &rendered.table().unwrap().rows;

        assert_eq!(rows[0].cells[6].plain(), "05 Mar 14:30");
        assert_eq!(rows[0].cells[7].plain(), "Ben Ortiz");
        assert_eq!(rows[1].cells[7].plain(), "user #99");
        assert_eq!(rows[2].cells[7], Cell::Empty);
        assert_eq!(rows[2].cells[6], Cell::Empty);
    }

    #[test]
    fn test_clicks_are_forwarded() {
        let issues = vec![issue(5), issue(3)];
        let view = IssueListView::new(&issues);
        let mut recorder = Recorder::default();

        assert!(view.click_row(1, &mut recorder));
        assert!(!view.click_row(2, &mut recorder));
        assert!(view.click_header(1, &mut recorder));
        assert!(!view.click_header(0, &mut recorder));

        assert_eq!(recorder.selected, vec![3]);
        assert_eq!(recorder.sorts, vec![SortField::Title]);
    }

    #[test]
    fn test_bad_timestamp_format_falls_back() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(at, "%Y-%m-%d"), "2024-01-02");
        assert_eq!(format_timestamp(at, "%Q"), at.to_rfc3339());
    }
}
