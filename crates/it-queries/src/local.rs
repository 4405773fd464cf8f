//! Client-side refinements
//!
//! The server handles every filter except "unassigned", and sorts every
//! column itself. Two things happen after a list fetch: the unassigned
//! filter drops assigned issues, and when that filter is combined with an
//! assignee sort the list is re-ordered locally.

use std::cmp::Ordering;

use it_core::traits::find_by_id;
use it_models::{Issue, User};

use crate::filters::FilterState;
use crate::sorts::{SortDirection, SortField, SortState};

/// Apply the local filter and sort to a fetched issue list
pub fn refine(issues: Vec<Issue>, filters: &FilterState, sort: &SortState) -> Vec<Issue> {
    let mut issues = if filters.unassigned() {
        issues.into_iter().filter(Issue::is_unassigned).collect()
    } else {
        issues
    };

    if sorts_locally(filters, sort) {
        sort_by_assignee(&mut issues, sort.direction);
    }
    issues
}

/// Whether the server order must be replaced
pub fn sorts_locally(filters: &FilterState, sort: &SortState) -> bool {
    sort.field == SortField::AssignedToId && filters.unassigned()
}

/// Stable sort on assignee id; missing assignees come first when ascending
pub fn sort_by_assignee(issues: &mut [Issue], direction: SortDirection) {
    issues.sort_by(|a, b| {
        let ordering: Ordering = a.assigned_to_id.cmp(&b.assigned_to_id);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Resolve an issue's assignee against the fetched user list
pub fn assignee_of<'a>(issue: &Issue, users: &'a [User]) -> Option<&'a User> {
    issue.assigned_to_id.and_then(|id| find_by_id(users, id))
}

/// Resolve an issue's creator against the fetched user list
pub fn creator_of<'a>(issue: &Issue, users: &'a [User]) -> Option<&'a User> {
    issue.user_id.and_then(|id| find_by_id(users, id))
}
