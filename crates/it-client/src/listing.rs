//! Issue listing controller
//!
//! Owns the filter and sort state of the issue list and the latest fetched
//! snapshot. Every refresh draws a ticket; a result is applied only while
//! its ticket is still the newest one issued, so a slow response to an old
//! filter can never overwrite a newer list.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use it_core::{Id, ItResult};
use it_models::{Issue, Taxonomies, TaxonomyKind, User};
use it_queries::{local, FilterDimension, FilterState, QueryParams, SortField, SortState};

use crate::gateway::TrackerGateway;

/// Shown instead of the list when a fetch fails
pub const LOAD_FAILED_MESSAGE: &str = "Could not load issues. Please try again later.";

/// What the list UI renders from
#[derive(Debug, Clone, Default)]
pub struct ListingSnapshot {
    /// Refined issues in display order
    pub issues: Vec<Issue>,
    pub taxonomies: Taxonomies,
    pub users: Vec<User>,
    pub loading: bool,
    /// Generic failure message from the last applied refresh
    pub error: Option<String>,
    /// Ticket of the refresh that produced this snapshot; 0 before the first
    pub ticket: u64,
}

impl ListingSnapshot {
    /// Resolved assignee of an issue
    pub fn assignee(&self, issue: &Issue) -> Option<&User> {
        local::assignee_of(issue, &self.users)
    }

    /// Issue at a 1-based row number
    pub fn row(&self, number: usize) -> Option<&Issue> {
        number.checked_sub(1).and_then(|i| self.issues.get(i))
    }
}

/// Result of one refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced with `count` issues
    Applied { count: usize },
    /// Fetch failed; snapshot shows an empty list and the generic message
    Failed,
    /// A newer refresh was issued meanwhile; result discarded
    Superseded,
}

#[derive(Debug, Default)]
struct ListingState {
    filters: FilterState,
    sort: SortState,
    snapshot: ListingSnapshot,
}

struct Fetched {
    taxonomies: Taxonomies,
    users: Vec<User>,
    issues: Vec<Issue>,
}

/// Controller for the issue list
pub struct IssueListing {
    gateway: Arc<dyn TrackerGateway>,
    state: Mutex<ListingState>,
    latest_ticket: AtomicU64,
}

impl IssueListing {
    pub fn new(gateway: Arc<dyn TrackerGateway>) -> Self {
        Self::with_state(gateway, FilterState::default(), SortState::default())
    }

    /// Start from pre-set filters and sort, e.g. parsed from the command line
    pub fn with_state(gateway: Arc<dyn TrackerGateway>, filters: FilterState, sort: SortState) -> Self {
        Self {
            gateway,
            state: Mutex::new(ListingState {
                filters,
                sort,
                snapshot: ListingSnapshot::default(),
            }),
            latest_ticket: AtomicU64::new(0),
        }
    }

    pub fn filters(&self) -> FilterState {
        self.state.lock().filters.clone()
    }

    pub fn sort(&self) -> SortState {
        self.state.lock().sort
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        self.state.lock().snapshot.clone()
    }

    /// Parameters the next refresh will send
    pub fn params(&self) -> QueryParams {
        let state = self.state.lock();
        QueryParams::build(&state.filters, &state.sort)
    }

    /// Toggle an id in a filter dimension; returns whether it is now selected
    pub fn toggle_filter(&self, dimension: FilterDimension, id: Id) -> bool {
        self.state.lock().filters.toggle(dimension, id)
    }

    pub fn set_search(&self, text: impl Into<String>) {
        self.state.lock().filters.set_search(text);
    }

    pub fn set_unassigned(&self, unassigned: bool) {
        self.state.lock().filters.set_unassigned(unassigned);
    }

    /// Flip the unassigned flag; returns the new value
    pub fn toggle_unassigned(&self) -> bool {
        let mut state = self.state.lock();
        let next = !state.filters.unassigned();
        state.filters.set_unassigned(next);
        next
    }

    pub fn clear_filters(&self) {
        self.state.lock().filters.clear();
    }

    /// Header click on a sortable column
    pub fn request_sort(&self, field: SortField) -> SortState {
        let mut state = self.state.lock();
        state.sort.sort_by(field);
        state.sort
    }

    /// Fetch taxonomies, users and issues for the current state
    ///
    /// Taxonomies and users are fetched concurrently; issues are only
    /// applied once all of them have resolved.
    pub async fn refresh(&self) -> RefreshOutcome {
        let (ticket, filters, sort) = self.begin_refresh();
        let params = QueryParams::build(&filters, &sort);
        tracing::debug!(ticket, params = %params.to_json(), "Refreshing issue list");

        let result = self.fetch(&params).await;

        let mut state = self.state.lock();
        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "Discarding superseded issue list");
            return RefreshOutcome::Superseded;
        }

        let snapshot = &mut state.snapshot;
        snapshot.loading = false;
        snapshot.ticket = ticket;
        match result {
            Ok(fetched) => {
                snapshot.issues = local::refine(fetched.issues, &filters, &sort);
                snapshot.taxonomies = fetched.taxonomies;
                snapshot.users = fetched.users;
                snapshot.error = None;
                tracing::info!(ticket, count = snapshot.issues.len(), "Issue list updated");
                RefreshOutcome::Applied {
                    count: snapshot.issues.len(),
                }
            }
            Err(e) => {
                tracing::error!(ticket, error = %e, code = e.error_code(), "Error fetching issues");
                snapshot.issues.clear();
                snapshot.error = Some(LOAD_FAILED_MESSAGE.to_string());
                RefreshOutcome::Failed
            }
        }
    }

    /// Issue a ticket and capture the state it applies to
    ///
    /// Both happen under the state lock so a newer ticket never carries
    /// older filters.
    fn begin_refresh(&self) -> (u64, FilterState, SortState) {
        let mut state = self.state.lock();
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        state.snapshot.loading = true;
        (ticket, state.filters.clone(), state.sort)
    }

    /// Full record of one issue with its comments
    ///
    /// List payloads omit the description and comments, so both are fetched
    /// on selection.
    pub async fn issue_detail(&self, id: Id) -> ItResult<Issue> {
        let gateway = self.gateway.as_ref();
        let (mut issue, comments) =
            tokio::try_join!(gateway.get_issue(id), gateway.list_comments(id))?;
        tracing::debug!(issue_id = id, comments = comments.len(), "Loaded issue detail");
        issue.comments = comments;
        Ok(issue)
    }

    async fn fetch(&self, params: &QueryParams) -> ItResult<Fetched> {
        let gateway = self.gateway.as_ref();
        let (types, severities, priorities, statuses, users) = tokio::try_join!(
            gateway.list_taxonomy(TaxonomyKind::Type),
            gateway.list_taxonomy(TaxonomyKind::Severity),
            gateway.list_taxonomy(TaxonomyKind::Priority),
            gateway.list_taxonomy(TaxonomyKind::Status),
            gateway.list_users(),
        )?;
        let issues = gateway.list_issues(params).await?;

        Ok(Fetched {
            taxonomies: Taxonomies {
                types,
                severities,
                priorities,
                statuses,
            },
            users,
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockTrackerGateway;
    use async_trait::async_trait;
    use it_core::ItError;
    use it_models::{Comment, Description, TaxonomyEntry};
    use it_queries::SortDirection;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Gateway whose issue fetch for the search "slow" blocks until released
    #[derive(Default)]
    struct GatedGateway {
        slow_started: Notify,
        release: Notify,
    }

    #[async_trait]
    impl TrackerGateway for GatedGateway {
        async fn list_issues(&self, params: &QueryParams) -> ItResult<Vec<Issue>> {
            if params.search.as_deref() == Some("slow") {
                self.slow_started.notify_one();
                self.release.notified().await;
                return Ok(vec![Issue::new(1, "stale result")]);
            }
            Ok(vec![Issue::new(2, "fresh result")])
        }

        async fn get_issue(&self, id: Id) -> ItResult<Issue> {
            Ok(Issue::new(id, "detail"))
        }

        async fn list_comments(&self, _issue_id: Id) -> ItResult<Vec<Comment>> {
            Ok(vec![])
        }

        async fn list_taxonomy(&self, kind: TaxonomyKind) -> ItResult<Vec<TaxonomyEntry>> {
            Ok(vec![TaxonomyEntry::new(1, kind.caption(), "#cccccc")])
        }

        async fn list_users(&self) -> ItResult<Vec<User>> {
            Ok(vec![User::new(4, "ben")])
        }

        async fn current_user(&self) -> ItResult<User> {
            Ok(User::new(4, "ben"))
        }
    }

    fn mock_with_lookups() -> MockTrackerGateway {
        let mut mock = MockTrackerGateway::new();
        mock.expect_list_taxonomy()
            .returning(|kind| Ok(vec![TaxonomyEntry::new(1, kind.caption(), "#123456")]));
        mock.expect_list_users()
            .returning(|| Ok(vec![User::new(4, "ben"), User::new(5, "ana")]));
        mock
    }

    #[tokio::test]
    async fn test_last_issued_refresh_wins() {
        let gateway = Arc::new(GatedGateway::default());
        let listing = Arc::new(IssueListing::new(gateway.clone()));

        listing.set_search("slow");
        let first = {
            let listing = listing.clone();
            tokio::spawn(async move { listing.refresh().await })
        };
        gateway.slow_started.notified().await;
        assert!(listing.snapshot().loading);

        listing.set_search("fast");
        assert_eq!(listing.refresh().await, RefreshOutcome::Applied { count: 1 });

        gateway.release.notify_one();
        assert_eq!(first.await.unwrap(), RefreshOutcome::Superseded);

        let snapshot = listing.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.issues.len(), 1);
        assert_eq!(snapshot.issues[0].id, 2);
        assert_eq!(snapshot.ticket, 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_issues() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut mock = mock_with_lookups();
        {
            let calls = calls.clone();
            mock.expect_list_issues().returning(move |_| {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Ok(vec![Issue::new(7, "first load")])
                } else {
                    Err(ItError::Transport("connection refused".into()))
                }
            });
        }

        let listing = IssueListing::new(Arc::new(mock));
        assert_eq!(listing.refresh().await, RefreshOutcome::Applied { count: 1 });
        assert!(listing.snapshot().error.is_none());

        assert_eq!(listing.refresh().await, RefreshOutcome::Failed);
        let snapshot = listing.snapshot();
        assert!(snapshot.issues.is_empty());
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error.as_deref(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_taxonomy_failure_is_a_failed_refresh() {
        let mut mock = MockTrackerGateway::new();
        mock.expect_list_taxonomy().returning(|kind| match kind {
            TaxonomyKind::Priority => Err(ItError::from_status(500, "/priorities", "boom")),
            other => Ok(vec![TaxonomyEntry::new(1, other.caption(), "#fff")]),
        });
        mock.expect_list_users().returning(|| Ok(vec![]));
        mock.expect_list_issues().never();

        let listing = IssueListing::new(Arc::new(mock));
        assert_eq!(listing.refresh().await, RefreshOutcome::Failed);
    }

    #[tokio::test]
    async fn test_refresh_sends_current_state_and_refines() {
        let mut mock = mock_with_lookups();
        mock.expect_list_issues()
            .withf(|params: &QueryParams| {
                params.filter(FilterDimension::Status) == Some(&[3][..])
                    && params.sort == SortField::AssignedToId
                    && params.direction == SortDirection::Asc
            })
            .returning(|_| {
                Ok(vec![
                    Issue::new(1, "assigned").assigned_to(4),
                    Issue::new(2, "open"),
                    Issue::new(3, "also open"),
                ])
            });

        let listing = IssueListing::new(Arc::new(mock));
        listing.toggle_filter(FilterDimension::Status, 3);
        listing.request_sort(SortField::AssignedToId);
        assert!(listing.toggle_unassigned());

        assert_eq!(listing.refresh().await, RefreshOutcome::Applied { count: 2 });
        let snapshot = listing.snapshot();
        let ids: Vec<Id> = snapshot.issues.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(snapshot.taxonomies.get(TaxonomyKind::Status)[0].name, "Statuses");
        assert_eq!(snapshot.users.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_resolves_assignees_and_rows() {
        let mut mock = mock_with_lookups();
        mock.expect_list_issues()
            .returning(|_| Ok(vec![Issue::new(5, "five").assigned_to(5), Issue::new(3, "three")]));

        let listing = IssueListing::new(Arc::new(mock));
        listing.refresh().await;
        let snapshot = listing.snapshot();

        let first = snapshot.row(1).unwrap();
        assert_eq!(first.id, 5);
        assert_eq!(snapshot.assignee(first).map(User::display_name), Some("ana"));
        assert!(snapshot.assignee(snapshot.row(2).unwrap()).is_none());
        assert!(snapshot.row(0).is_none());
        assert!(snapshot.row(3).is_none());
    }

    #[test]
    fn test_request_sort_follows_header_semantics() {
        let listing = IssueListing::new(Arc::new(MockTrackerGateway::new()));
        assert_eq!(listing.sort(), SortState::default());

        let sort = listing.request_sort(SortField::Title);
        assert_eq!(sort, SortState::new(SortField::Title, SortDirection::Asc));
        let sort = listing.request_sort(SortField::Title);
        assert_eq!(sort.direction, SortDirection::Desc);
        assert_eq!(listing.params().direction, SortDirection::Desc);
    }

    #[test]
    fn test_ticket_is_paired_with_current_state() {
        let listing = IssueListing::new(Arc::new(MockTrackerGateway::new()));

        listing.set_search("first");
        let (ticket, filters, _) = listing.begin_refresh();
        assert_eq!((ticket, filters.search()), (1, "first"));

        listing.set_search("second");
        listing.request_sort(SortField::Title);
        let (ticket, filters, sort) = listing.begin_refresh();
        assert_eq!((ticket, filters.search()), (2, "second"));
        assert_eq!(sort.field, SortField::Title);
        assert!(listing.snapshot().loading);
    }

    #[tokio::test]
    async fn test_issue_detail_merges_comments() {
        let mut mock = MockTrackerGateway::new();
        mock.expect_get_issue()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|id| {
                let mut issue = Issue::new(id, "Login button unresponsive");
                issue.description = Some(Description::Plain("Clicking does nothing".into()));
                Ok(issue)
            });
        mock.expect_list_comments()
            .withf(|id| *id == 42)
            .times(1)
            .returning(|_| {
                Ok(vec![Comment {
                    id: 1,
                    user_id: Some(4),
                    body: "Reproduced on Safari".into(),
                    created_at: None,
                }])
            });

        let listing = IssueListing::new(Arc::new(mock));
        let issue = listing.issue_detail(42).await.unwrap();
        assert_eq!(issue.description_text(), Some("Clicking does nothing"));
        assert_eq!(issue.comments.len(), 1);
        assert_eq!(issue.comments[0].body, "Reproduced on Safari");
    }

    #[tokio::test]
    async fn test_issue_detail_propagates_errors() {
        let mut mock = MockTrackerGateway::new();
        mock.expect_get_issue()
            .returning(|_| Err(ItError::from_status(404, "/issues/9", "not found")));
        mock.expect_list_comments().returning(|_| Ok(vec![]));

        let listing = IssueListing::new(Arc::new(mock));
        let err = listing.issue_detail(9).await.unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }
}
