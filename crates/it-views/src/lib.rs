//! # it-views
//!
//! Rendering for issuetrack.
//!
//! [`IssueListView`] builds a backend-neutral table from an ordered issue
//! slice and forwards clicks through [`ListEvents`]; [`TextRenderer`] lays
//! that table out for a terminal.

pub mod columns;
pub mod detail;
pub mod list;
pub mod text;

pub use columns::{Column, ColumnKind, ColumnSet};
pub use detail::{render_filter_options, IssueDetailView};
pub use list::{Badge, Cell, HeaderCell, IssueListView, IssueRow, IssueTable, ListEvents, RenderedList, NO_RESULTS};
pub use text::TextRenderer;
