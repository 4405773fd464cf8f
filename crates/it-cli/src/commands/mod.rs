//! Subcommand implementations

pub mod auth;
pub mod browse;
pub mod filters;
pub mod issues;

use it_client::ListingSnapshot;
use it_queries::SortState;
use it_views::{IssueListView, TextRenderer};

/// Issue table for a snapshot; callers report `snapshot.error` themselves
pub(crate) fn render_snapshot(
    renderer: TextRenderer,
    snapshot: &ListingSnapshot,
    sort: SortState,
    timestamp_format: &str,
) -> String {
    let view = IssueListView::new(&snapshot.issues)
        .with_users(&snapshot.users)
        .with_sort(sort)
        .with_timestamp_format(timestamp_format);
    renderer.render(&view.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use it_client::LOAD_FAILED_MESSAGE;
    use it_models::Issue;

    #[test]
    fn test_failed_snapshot_renders_placeholder_only() {
        let snapshot = ListingSnapshot {
            error: Some(LOAD_FAILED_MESSAGE.to_string()),
            ..Default::default()
        };
        let out = render_snapshot(TextRenderer::new(false), &snapshot, SortState::default(), "%d %b");
        assert_eq!(out, "No issues found\n");
    }

    #[test]
    fn test_snapshot_table() {
        let snapshot = ListingSnapshot {
            issues: vec![Issue::new(5, "Crash on save"), Issue::new(3, "Typo")],
            ..Default::default()
        };
        let out = render_snapshot(TextRenderer::new(false), &snapshot, SortState::default(), "%d %b");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("#5"));
        assert!(lines[0].contains("Updated ↓"));
    }
}
