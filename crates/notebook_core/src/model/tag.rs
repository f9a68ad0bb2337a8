//! Tag domain model.
//!
//! # Responsibility
//! - Define the tag record owned by the global tag collection.
//!
//! # Invariants
//! - `id` is stable and never reused for another tag.
//! - `label` is mutable, stored as given and may repeat across tags.

use serde::{Deserialize, Serialize};

string_id! {
    /// Stable identifier for a tag.
    TagId
}

/// Label attached to notes by reference.
///
/// Notes store only `id`, so relabeling a tag never rewrites notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub label: String,
}

impl Tag {
    /// Creates a tag with a freshly generated id.
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_id(TagId::generate(), label)
    }

    /// Creates a tag with a caller-provided id.
    ///
    /// Used when the tag object is built before it reaches the store, e.g. by
    /// an inline "create tag" control in a note form.
    pub fn with_id(id: impl Into<TagId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}
