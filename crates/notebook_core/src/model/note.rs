//! Note domain model.
//!
//! # Responsibility
//! - Define the durable note shape (`RawNote`) and the derived view (`Note`).
//! - Define the mutation input (`NoteData`) submitted by callers.
//!
//! # Invariants
//! - `RawNote` references tags by id only.
//! - `Note` is never persisted; it is rebuilt from `RawNote` + tags.
//! - Serialized field names are camelCase (`tagIds`).

use crate::model::tag::{Tag, TagId};
use serde::{Deserialize, Serialize};

string_id! {
    /// Stable identifier for a note.
    NoteId
}

/// Durable note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNote {
    pub id: NoteId,
    pub title: String,
    /// Markdown body source.
    pub markdown: String,
    /// Foreign keys into the tag collection, in caller order.
    pub tag_ids: Vec<TagId>,
}

impl RawNote {
    /// Builds a durable note with a fresh id from submitted data.
    pub fn from_data(data: NoteData) -> Self {
        Self::with_id(NoteId::generate(), data)
    }

    /// Builds a durable note with a caller-provided id.
    pub fn with_id(id: NoteId, data: NoteData) -> Self {
        let tag_ids = data.tag_ids();
        Self {
            id,
            title: data.title,
            markdown: data.markdown,
            tag_ids,
        }
    }

    /// Replaces every editable field, keeping `id`.
    pub fn apply(&mut self, data: NoteData) {
        self.tag_ids = data.tag_ids();
        self.title = data.title;
        self.markdown = data.markdown;
    }

    /// Whether this note references `tag_id`, resolved or not.
    pub fn references(&self, tag_id: &TagId) -> bool {
        self.tag_ids.contains(tag_id)
    }
}

/// Note with tag references resolved to full tag objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

/// Editable note fields as submitted by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteData {
    pub title: String,
    pub markdown: String,
    pub tags: Vec<Tag>,
}

impl NoteData {
    pub fn new(title: impl Into<String>, markdown: impl Into<String>, tags: Vec<Tag>) -> Self {
        Self {
            title: title.into(),
            markdown: markdown.into(),
            tags,
        }
    }

    fn tag_ids(&self) -> Vec<TagId> {
        self.tags.iter().map(|tag| tag.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteData, RawNote};
    use crate::model::tag::Tag;

    #[test]
    fn raw_note_keeps_tag_ids_in_submitted_order() {
        let first = Tag::new("b");
        let second = Tag::new("a");
        let note = RawNote::from_data(NoteData::new(
            "title",
            "body",
            vec![first.clone(), second.clone()],
        ));
        assert_eq!(note.tag_ids, vec![first.id, second.id]);
    }

    #[test]
    fn apply_keeps_identity() {
        let mut note = RawNote::from_data(NoteData::new("old", "old body", Vec::new()));
        let id = note.id.clone();
        let tag = Tag::new("fresh");
        note.apply(NoteData::new("new", "new body", vec![tag.clone()]));
        assert_eq!(note.id, id);
        assert_eq!(note.title, "new");
        assert!(note.references(&tag.id));
    }
}
