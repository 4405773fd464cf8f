//! Attachment model

use it_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

/// A file attached to an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Id,
    pub filename: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub byte_size: u64,
}

impl Attachment {
    /// Size in KiB with one decimal, e.g. "12.5 KB"
    pub fn display_size(&self) -> String {
        format!("{:.1} KB", self.byte_size as f64 / 1024.0)
    }
}

impl Identifiable for Attachment {
    fn id(&self) -> Id {
        self.id
    }
}
