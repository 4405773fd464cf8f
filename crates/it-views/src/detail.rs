//! Issue detail and filter option views

use std::fmt::Write;

use it_models::{Issue, Labeled, Taxonomies, TaxonomyKind, User};
use it_queries::{local, FilterDimension, FilterState};

use crate::list::format_timestamp;
use crate::text::TextRenderer;

/// Full text view of one issue
pub struct IssueDetailView<'a> {
    issue: &'a Issue,
    users: &'a [User],
    renderer: TextRenderer,
    timestamp_format: &'a str,
}

impl<'a> IssueDetailView<'a> {
    pub fn new(issue: &'a Issue, users: &'a [User], renderer: TextRenderer, timestamp_format: &'a str) -> Self {
        Self {
            issue,
            users,
            renderer,
            timestamp_format,
        }
    }

    pub fn render(&self) -> String {
        let issue = self.issue;
        let mut out = String::new();

        let _ = writeln!(out, "#{} {}", issue.id, issue.title);

        let badges: Vec<String> = TaxonomyKind::ALL
            .iter()
            .map(|kind| {
                let value = issue
                    .taxonomy(*kind)
                    .map(|e| self.renderer.badge(e.label(), e.color()))
                    .unwrap_or_else(|| "-".to_string());
                format!("{}: {}", caption(*kind), value)
            })
            .collect();
        let _ = writeln!(out, "{}", badges.join("   "));

        let assignee = local::assignee_of(issue, self.users)
            .map(|u| u.display_name().to_string())
            .or_else(|| issue.assigned_to_id.map(|id| format!("user #{}", id)))
            .unwrap_or_else(|| "unassigned".to_string());
        let creator = local::creator_of(issue, self.users)
            .map(|u| u.display_name().to_string())
            .or_else(|| issue.user_id.map(|id| format!("user #{}", id)))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(out, "Assignee: {}   Creator: {}", assignee, creator);

        if let Some(created) = issue.created_at {
            let _ = write!(out, "Created: {}", format_timestamp(created, self.timestamp_format));
            if let Some(updated) = issue.updated_at {
                let _ = write!(out, "   Updated: {}", format_timestamp(updated, self.timestamp_format));
            }
            out.push('\n');
        }

        if let Some(due) = issue.due_date {
            let _ = write!(out, "Due: {}", due.format("%Y-%m-%d"));
            if let Some(reason) = issue.due_date_reason.as_deref().filter(|r| !r.trim().is_empty()) {
                let _ = write!(out, " ({})", reason);
            }
            out.push('\n');
        }
        if issue.blocked {
            out.push_str("BLOCKED\n");
        }

        out.push('\n');
        match issue.description_text() {
            Some(text) => {
                for line in text.lines() {
                    let _ = writeln!(out, "  {}", line);
                }
            }
            None => out.push_str("  (no description)\n"),
        }

        if !issue.attachments.is_empty() {
            let _ = writeln!(out, "\nAttachments ({}):", issue.attachments.len());
            for attachment in &issue.attachments {
                let _ = write!(out, "  {} ({})", attachment.filename, attachment.display_size());
                if let Some(url) = &attachment.url {
                    let _ = write!(out, " {}", url);
                }
                out.push('\n');
            }
        }

        if !issue.comments.is_empty() {
            let _ = writeln!(out, "\nComments ({}):", issue.comments.len());
            for comment in &issue.comments {
                let author = comment
                    .user_id
                    .and_then(|id| it_models::find_by_id(self.users, id))
                    .map(|u| u.display_name().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let when = comment
                    .created_at
                    .map(|at| format!(", {}", format_timestamp(at, self.timestamp_format)))
                    .unwrap_or_default();
                let _ = writeln!(out, "  {}{}: {}", author, when, comment.body);
            }
        }

        out
    }
}

fn caption(kind: TaxonomyKind) -> &'static str {
    match kind {
        TaxonomyKind::Type => "Type",
        TaxonomyKind::Severity => "Severity",
        TaxonomyKind::Priority => "Priority",
        TaxonomyKind::Status => "Status",
    }
}

/// Available filter values per dimension, current selections marked `[x]`
pub fn render_filter_options(
    renderer: &TextRenderer,
    taxonomies: &Taxonomies,
    users: &[User],
    filters: &FilterState,
) -> String {
    let mut out = String::new();
    for dimension in FilterDimension::ALL {
        let _ = writeln!(out, "{}:", dimension);
        let mut options: Vec<(i64, String)> = match dimension.taxonomy() {
            Some(kind) => taxonomies
                .get(kind)
                .iter()
                .map(|e| (e.id, renderer.badge(e.label(), e.color())))
                .collect(),
            None => users
                .iter()
                .map(|u| (u.id, format!("{} (@{})", u.display_name(), u.username)))
                .collect(),
        };
        if options.is_empty() {
            out.push_str("  (none)\n");
            continue;
        }
        options.sort_by_key(|(id, _)| *id);
        for (id, label) in options {
            let mark = if filters.is_selected(dimension, id) { "x" } else { " " };
            let _ = writeln!(out, "  [{}] {:>3}  {}", mark, id, label);
        }
    }

    let _ = writeln!(
        out,
        "unassigned: [{}]",
        if filters.unassigned() { "x" } else { " " }
    );
    if !filters.search().is_empty() {
        let _ = writeln!(out, "search: {:?}", filters.search());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use it_models::{Attachment, Comment, Description, TaxonomyEntry};

    fn users() -> Vec<User> {
        vec![User::new(1, "ana").with_name("Ana Ruiz"), User::new(2, "ben")]
    }

    #[test]
    fn test_detail_view() {
        let mut issue = Issue::new(42, "Login button unresponsive")
            .with_taxonomy(TaxonomyKind::Type, TaxonomyEntry::new(1, "Bug", "#e74c3c"))
            .assigned_to(2);
        issue.user_id = Some(1);
        issue.description = Some(Description::Rich {
            body: Some("Clicking does nothing\non Safari".into()),
        });
        issue.due_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        issue.due_date_reason = Some("release".into());
        issue.blocked = true;
        issue.attachments.push(Attachment {
            id: 9,
            filename: "screen.png".into(),
            url: None,
            byte_size: 2048,
        });
        issue.comments.push(Comment {
            id: 1,
            user_id: Some(1),
            body: "Reproduced".into(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 2, 20, 10, 0, 0).unwrap()),
        });

        let users = users();
        let out = IssueDetailView::new(&issue, &users, TextRenderer::new(false), "%Y-%m-%d").render();

        assert!(out.starts_with("#42 Login button unresponsive\n"));
        assert!(out.contains("Type: ● Bug"));
        assert!(out.contains("Severity: -"));
        assert!(out.contains("Assignee: ben   Creator: Ana Ruiz"));
        assert!(out.contains("Due: 2024-03-01 (release)"));
        assert!(out.contains("BLOCKED"));
        assert!(out.contains("  on Safari\n"));
        assert!(out.contains("screen.png (2.0 KB)"));
        assert!(out.contains("Ana Ruiz, 2024-02-20: Reproduced"));
    }

    #[test]
    fn test_detail_without_optional_parts() {
        let issue = Issue::new(1, "Bare");
        let out = IssueDetailView::new(&issue, &[], TextRenderer::new(false), "%d %b").render();
        assert!(out.contains("Assignee: unassigned"));
        assert!(out.contains("(no description)"));
        assert!(!out.contains("Attachments"));
        assert!(!out.contains("Due:"));
    }

    #[test]
    fn test_filter_options_mark_selection() {
        let mut taxonomies = Taxonomies::default();
        taxonomies.set(
            TaxonomyKind::Type,
            vec![TaxonomyEntry::new(2, "Feature", "#00ff00"), TaxonomyEntry::new(1, "Bug", "#ff0000")],
        );
        let mut filters = FilterState::new().with(FilterDimension::Type, 2);
        filters.set_unassigned(true);

        let out = render_filter_options(&TextRenderer::new(false), &taxonomies, &users(), &filters);
        let bug = out.find("● Bug").unwrap();
        let feature = out.find("● Feature").unwrap();
        assert!(bug < feature);
        assert!(out.contains("[x]   2  ● Feature"));
        assert!(out.contains("[ ]   1  ● Bug"));
        assert!(out.contains("severity:\n  (none)"));
        assert!(out.contains("Ana Ruiz (@ana)"));
        assert!(out.contains("unassigned: [x]"));
    }
}
