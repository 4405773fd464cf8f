//! # it-models
//!
//! Domain models for issuetrack.
//!
//! These structs mirror the JSON the tracker API returns. They are read-only
//! views: the listing and rendering code never mutates an issue.

pub use it_core::traits::{find_by_id, Id, Identifiable, Labeled, Timestamped};
pub use it_core::types::Color;

pub mod issue;
pub mod taxonomy;
pub mod user;
pub mod comment;
pub mod attachment;

// Re-exports for convenience
pub use issue::{Description, Issue};
pub use taxonomy::{Taxonomies, TaxonomyEntry, TaxonomyKind};
pub use user::User;
pub use comment::Comment;
pub use attachment::Attachment;
