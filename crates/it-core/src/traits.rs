//! Core traits shared by the domain models

use chrono::{DateTime, Utc};

/// Primary key type used by the tracker API
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Id;
}

/// Trait for entities with timestamps (created_at, updated_at)
pub trait Timestamped {
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
}

/// Trait for entities that carry a display name and a display color
pub trait Labeled {
    fn label(&self) -> &str;
    fn color(&self) -> Option<&crate::types::Color>;
}

/// Find an entity by id in a fetched collection
pub fn find_by_id<T: Identifiable>(items: &[T], id: Id) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}
