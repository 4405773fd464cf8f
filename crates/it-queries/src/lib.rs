//! # it-queries
//!
//! Query layer for issuetrack.
//!
//! This crate turns what the user picked in the list UI into the parameters
//! of `GET /issues`, and applies the few refinements the server does not do.
//!
//! ## Structure
//!
//! - `filters` - Per-dimension id selections, search text, unassigned flag
//! - `sorts` - Sort column and direction, header-click semantics
//! - `builder` - Mapping of filter and sort state to request parameters
//! - `local` - Client-side unassigned filter, assignee sort and lookups
//!
//! ## Example
//!
//! ```
//! use it_queries::{FilterDimension, FilterState, QueryParams, SortField, SortState};
//!
//! let mut filters = FilterState::new();
//! filters.toggle(FilterDimension::Type, 2);
//! filters.set_search("login");
//!
//! let mut sort = SortState::default();
//! sort.sort_by(SortField::Title);
//!
//! let params = QueryParams::build(&filters, &sort);
//! assert_eq!(params.to_json()["filter_type[]"], serde_json::json!([2]));
//! assert_eq!(params.to_json()["direction"], "asc");
//! ```

pub mod filters;
pub mod sorts;
pub mod builder;
pub mod local;

// Re-exports for convenience
pub use filters::{FilterDimension, FilterState};
pub use sorts::{SortDirection, SortField, SortState};
pub use builder::QueryParams;
