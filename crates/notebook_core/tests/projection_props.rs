use notebook_core::{
    project, MemorySlotStorage, NoteData, NoteQuery, Notebook, RawNote, Tag, TagId,
};
use proptest::prelude::*;

fn tag_pool(size: usize) -> Vec<Tag> {
    (0..size).map(|idx| Tag::new(format!("tag-{idx}"))).collect()
}

/// Raw notes referencing pool tags by index, plus some ids that never resolve.
fn raw_notes(pool: &[Tag], picks: &[Vec<(usize, bool)>]) -> Vec<RawNote> {
    picks
        .iter()
        .enumerate()
        .map(|(idx, refs)| {
            let mut note = RawNote::from_data(NoteData::new(format!("note {idx}"), "", Vec::new()));
            note.tag_ids = refs
                .iter()
                .map(|(pick, dangling)| {
                    if *dangling || pool.is_empty() {
                        TagId::from(format!("dangling-{pick}"))
                    } else {
                        pool[pick % pool.len()].id.clone()
                    }
                })
                .collect();
            note
        })
        .collect()
}

proptest! {
    #[test]
    fn projection_filters_tags_in_collection_order(
        pool_size in 0usize..8,
        live in proptest::collection::vec(any::<bool>(), 8),
        picks in proptest::collection::vec(
            proptest::collection::vec((0usize..8, any::<bool>()), 0..6),
            0..10,
        ),
    ) {
        let pool = tag_pool(pool_size);
        let notes = raw_notes(&pool, &picks);
        // Drop some tags from the live collection to create dangling ids.
        let tags: Vec<Tag> = pool
            .iter()
            .zip(live.iter())
            .filter(|(_, keep)| **keep)
            .map(|(tag, _)| tag.clone())
            .collect();

        let view = project(&notes, &tags);
        prop_assert_eq!(view.len(), notes.len());
        for (raw, note) in notes.iter().zip(view.iter()) {
            prop_assert_eq!(&note.id, &raw.id);
            let expected: Vec<Tag> = tags
                .iter()
                .filter(|tag| raw.tag_ids.contains(&tag.id))
                .cloned()
                .collect();
            prop_assert_eq!(&note.tags, &expected);
        }
    }

    #[test]
    fn raw_note_json_round_trips(
        title in ".{0,40}",
        markdown in ".{0,200}",
        tag_count in 0usize..5,
    ) {
        let tags = tag_pool(tag_count);
        let note = RawNote::from_data(NoteData::new(title, markdown, tags));
        let encoded = serde_json::to_string(&note).unwrap();
        let decoded: RawNote = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, note);
    }

    #[test]
    fn title_search_only_returns_matching_notes(
        titles in proptest::collection::vec("[a-zA-Z ]{1,12}", 1..12),
        needle in "[a-z]{1,3}",
    ) {
        let mut notebook = Notebook::open(MemorySlotStorage::new()).unwrap();
        for title in &titles {
            if title.trim().is_empty() {
                continue;
            }
            notebook.create_note(NoteData::new(title.clone(), "", Vec::new())).unwrap();
        }

        let hits = notebook.search(&NoteQuery::default().title(needle.clone()));
        let expected = notebook
            .raw_notes()
            .iter()
            .filter(|note| note.title.to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(hits.len(), expected);
        for hit in hits {
            prop_assert!(hit.title.to_lowercase().contains(&needle));
        }
    }
}
