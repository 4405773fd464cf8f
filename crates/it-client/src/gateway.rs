//! Remote data gateway
//!
//! The read side of the tracker API, behind a trait so the listing logic can
//! run against mocks and stubs.

use async_trait::async_trait;

use it_core::{Id, ItResult};
use it_models::{Comment, Issue, TaxonomyEntry, TaxonomyKind, User};
use it_queries::QueryParams;

/// Read access to the tracker REST API
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait TrackerGateway: Send + Sync {
    /// `GET /issues` with filter and sort parameters
    async fn list_issues(&self, params: &QueryParams) -> ItResult<Vec<Issue>>;

    /// `GET /issues/:id`, the full record including description
    async fn get_issue(&self, id: Id) -> ItResult<Issue>;

    /// `GET /issues/:id/comments`
    async fn list_comments(&self, issue_id: Id) -> ItResult<Vec<Comment>>;

    /// `GET /types`, `/severities`, `/priorities` or `/statuses`
    async fn list_taxonomy(&self, kind: TaxonomyKind) -> ItResult<Vec<TaxonomyEntry>>;

    /// `GET /users`
    async fn list_users(&self) -> ItResult<Vec<User>>;

    /// `GET /users/me`
    async fn current_user(&self) -> ItResult<User>;
}
