//! Note/tag join and its memoized view.
//!
//! # Responsibility
//! - Resolve each note's tag ids against the live tag collection.
//! - Cache the joined view until either input collection is rewritten.
//!
//! # Invariants
//! - `project` is pure and total.
//! - Resolved tags keep tag-collection order, not `tag_ids` order.
//! - Tag ids that resolve to nothing are dropped silently.
//! - The cache recomputes only when the input stamp changes.

use crate::model::note::{Note, RawNote};
use crate::model::tag::Tag;
use log::trace;

/// Joins raw notes with tags, one `Note` per `RawNote`, in note order.
pub fn project(raw_notes: &[RawNote], tags: &[Tag]) -> Vec<Note> {
    raw_notes
        .iter()
        .map(|note| project_one(note, tags))
        .collect()
}

/// Joins a single raw note with tags.
pub fn project_one(note: &RawNote, tags: &[Tag]) -> Note {
    Note {
        id: note.id.clone(),
        title: note.title.clone(),
        markdown: note.markdown.clone(),
        tags: tags
            .iter()
            .filter(|tag| note.references(&tag.id))
            .cloned()
            .collect(),
    }
}

/// Identity of the two inputs a cached view was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionStamp {
    pub notes_revision: u64,
    pub tags_revision: u64,
}

/// Memoized result of `project`.
#[derive(Debug, Default)]
pub struct ProjectionCache {
    stamp: Option<ProjectionStamp>,
    notes: Vec<Note>,
    recomputations: u64,
}

impl ProjectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the view for `stamp`, recomputing only on a stamp change.
    pub fn get_or_project(
        &mut self,
        stamp: ProjectionStamp,
        raw_notes: &[RawNote],
        tags: &[Tag],
    ) -> &[Note] {
        if self.stamp != Some(stamp) {
            self.notes = project(raw_notes, tags);
            self.stamp = Some(stamp);
            self.recomputations += 1;
            trace!(
                "event=projection_rebuild module=projection notes={} tags={} notes_revision={} tags_revision={}",
                raw_notes.len(),
                tags.len(),
                stamp.notes_revision,
                stamp.tags_revision
            );
        }
        &self.notes
    }

    /// How many times the view has been rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

#[cfg(test)]
mod tests {
    use super::{project, ProjectionCache, ProjectionStamp};
    use crate::model::note::{NoteData, RawNote};
    use crate::model::tag::{Tag, TagId};

    #[test]
    fn resolved_tags_follow_tag_collection_order() {
        let alpha = Tag::new("alpha");
        let beta = Tag::new("beta");
        let gamma = Tag::new("gamma");
        let note = RawNote::from_data(NoteData::new(
            "t",
            "m",
            vec![gamma.clone(), alpha.clone()],
        ));

        let view = project(&[note], &[alpha.clone(), beta, gamma.clone()]);
        assert_eq!(view[0].tags, vec![alpha, gamma]);
    }

    #[test]
    fn dangling_tag_ids_are_dropped() {
        let mut note = RawNote::from_data(NoteData::default());
        note.tag_ids = vec![TagId::from("missing")];

        let view = project(&[note.clone()], &[]);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, note.id);
        assert!(view[0].tags.is_empty());
    }

    #[test]
    fn cache_recomputes_only_on_stamp_change() {
        let tag = Tag::new("work");
        let note = RawNote::from_data(NoteData::new("t", "m", vec![tag.clone()]));
        let notes = vec![note];
        let mut cache = ProjectionCache::new();
        let stamp = ProjectionStamp {
            notes_revision: 0,
            tags_revision: 0,
        };

        assert_eq!(cache.get_or_project(stamp, &notes, &[tag.clone()]).len(), 1);
        cache.get_or_project(stamp, &notes, &[tag.clone()]);
        assert_eq!(cache.recomputations(), 1);

        let bumped = ProjectionStamp {
            tags_revision: 1,
            ..stamp
        };
        let view = cache.get_or_project(bumped, &notes, &[]);
        assert!(view[0].tags.is_empty());
        assert_eq!(cache.recomputations(), 2);
    }
}
