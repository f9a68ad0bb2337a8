//! Notebook application context and mutation use-cases.
//!
//! # Responsibility
//! - Own the slot storage, both persisted collections and the joined view.
//! - Provide the only sanctioned note/tag mutations.
//!
//! # Invariants
//! - Every mutation that changes a collection performs one durable write.
//! - Mutations targeting a missing id are silent no-ops: they return `false`
//!   and write nothing.
//! - Deleting a tag never rewrites notes; dangling ids are dropped by the
//!   projection.
//! - Note and tag ids are unique within their collection.
//! - Titles, markdown and labels are stored exactly as given.

use crate::config::NotebookConfig;
use crate::model::note::{Note, NoteData, NoteId, RawNote};
use crate::model::tag::{Tag, TagId};
use crate::persist::{LoadOutcome, PersistError, PersistedState};
use crate::projection::{project_one, ProjectionCache, ProjectionStamp};
use crate::service::listing::{filter_notes, NoteQuery, NoteSummary};
use crate::storage::SlotStorage;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NotebookResult<T> = Result<T, NotebookError>;

/// Service error for notebook use-cases.
#[derive(Debug)]
pub enum NotebookError {
    /// Slot load/save failure.
    Persist(PersistError),
    /// A tag with this id is already stored.
    DuplicateTagId(TagId),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persist(err) => write!(f, "{err}"),
            Self::DuplicateTagId(id) => write!(f, "tag id already exists: {id}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist(err) => Some(err),
            Self::DuplicateTagId(_) => None,
        }
    }
}

impl From<PersistError> for NotebookError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Notes, tags and their joined view over one slot store.
pub struct Notebook<S: SlotStorage> {
    storage: S,
    notes: PersistedState<Vec<RawNote>>,
    tags: PersistedState<Vec<Tag>>,
    view: ProjectionCache,
}

impl<S: SlotStorage> Notebook<S> {
    /// Opens a notebook with default slot keys and policy.
    pub fn open(storage: S) -> NotebookResult<Self> {
        Self::open_with_config(storage, &NotebookConfig::default())
    }

    /// Loads both collections from `storage` using `config` keys and policy.
    ///
    /// Absent slots start empty. Malformed slots follow
    /// `config.on_corrupt_slot`.
    pub fn open_with_config(storage: S, config: &NotebookConfig) -> NotebookResult<Self> {
        let notes: PersistedState<Vec<RawNote>> = PersistedState::initialize_with(
            &storage,
            config.notes_key.as_str(),
            Vec::new,
            config.on_corrupt_slot,
        )?;
        let tags: PersistedState<Vec<Tag>> = PersistedState::initialize_with(
            &storage,
            config.tags_key.as_str(),
            Vec::new,
            config.on_corrupt_slot,
        )?;

        info!(
            "event=notebook_open module=service status=ok notes={} tags={} notes_outcome={:?} tags_outcome={:?}",
            notes.get().len(),
            tags.get().len(),
            notes.load_outcome(),
            tags.load_outcome()
        );

        Ok(Self {
            storage,
            notes,
            tags,
            view: ProjectionCache::new(),
        })
    }

    /// Slots that were malformed at open time and replaced by empty defaults.
    pub fn recovered_slots(&self) -> Vec<&str> {
        [self.notes.key(), self.tags.key()]
            .into_iter()
            .zip([self.notes.load_outcome(), self.tags.load_outcome()])
            .filter(|(_, outcome)| *outcome == LoadOutcome::Recovered)
            .map(|(key, _)| key)
            .collect()
    }

    /// Durable note records, in creation order.
    pub fn raw_notes(&self) -> &[RawNote] {
        self.notes.get()
    }

    /// Tag collection, in creation order.
    pub fn tags(&self) -> &[Tag] {
        self.tags.get()
    }

    /// Joined view of all notes, rebuilt only after a collection changed.
    pub fn notes(&mut self) -> &[Note] {
        let stamp = self.stamp();
        self.view
            .get_or_project(stamp, self.notes.get(), self.tags.get())
    }

    /// Looks up one joined note by id.
    pub fn note(&self, id: &NoteId) -> Option<Note> {
        self.raw_note(id)
            .map(|note| project_one(note, self.tags.get()))
    }

    /// Looks up one tag by id.
    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.get().iter().find(|tag| tag.id == *id)
    }

    /// Notes matching `query`, as list cards.
    pub fn search(&mut self, query: &NoteQuery) -> Vec<NoteSummary> {
        filter_notes(self.notes(), query)
            .into_iter()
            .map(NoteSummary::from)
            .collect()
    }

    /// How many times the joined view has been rebuilt.
    pub fn projection_rebuilds(&self) -> u64 {
        self.view.recomputations()
    }

    /// Appends a new note with a fresh id and returns that id.
    pub fn create_note(&mut self, data: NoteData) -> NotebookResult<NoteId> {
        let mut note = RawNote::from_data(data);
        while self.raw_note(&note.id).is_some() {
            note.id = NoteId::generate();
        }
        let id = note.id.clone();

        self.notes.update(&mut self.storage, |prev| {
            let mut next = prev.clone();
            next.push(note);
            next
        })?;
        debug!("event=note_create module=service status=ok note_id={id}");
        Ok(id)
    }

    /// Replaces title, markdown and tags of note `id`.
    ///
    /// Returns `false` without writing when `id` is unknown.
    pub fn update_note(&mut self, id: &NoteId, data: NoteData) -> NotebookResult<bool> {
        if self.raw_note(id).is_none() {
            warn!("event=note_update module=service status=skipped reason=not_found note_id={id}");
            return Ok(false);
        }

        self.notes.update(&mut self.storage, |prev| {
            prev.iter()
                .map(|note| {
                    if note.id == *id {
                        let mut updated = note.clone();
                        updated.apply(data.clone());
                        updated
                    } else {
                        note.clone()
                    }
                })
                .collect()
        })?;
        debug!("event=note_update module=service status=ok note_id={id}");
        Ok(true)
    }

    /// Removes note `id`. Deleting an unknown id returns `false`.
    pub fn delete_note(&mut self, id: &NoteId) -> NotebookResult<bool> {
        if self.raw_note(id).is_none() {
            debug!("event=note_delete module=service status=skipped reason=not_found note_id={id}");
            return Ok(false);
        }

        self.notes.update(&mut self.storage, |prev| {
            prev.iter().filter(|note| note.id != *id).cloned().collect()
        })?;
        debug!("event=note_delete module=service status=ok note_id={id}");
        Ok(true)
    }

    /// Appends a tag with a fresh id.
    pub fn create_tag(&mut self, label: &str) -> NotebookResult<Tag> {
        let mut tag = Tag::new(label);
        while self.tag(&tag.id).is_some() {
            tag.id = TagId::generate();
        }
        self.push_tag(tag.clone())?;
        Ok(tag)
    }

    /// Appends a tag built by the caller, keeping its id.
    pub fn add_tag(&mut self, tag: Tag) -> NotebookResult<()> {
        if self.tag(&tag.id).is_some() {
            return Err(NotebookError::DuplicateTagId(tag.id));
        }
        self.push_tag(tag)
    }

    /// Relabels tag `id`. Returns `false` without writing when `id` is unknown.
    pub fn update_tag(&mut self, id: &TagId, label: &str) -> NotebookResult<bool> {
        if self.tag(id).is_none() {
            warn!("event=tag_update module=service status=skipped reason=not_found tag_id={id}");
            return Ok(false);
        }

        self.tags.update(&mut self.storage, |prev| {
            prev.iter()
                .map(|tag| {
                    if tag.id == *id {
                        Tag::with_id(id.clone(), label)
                    } else {
                        tag.clone()
                    }
                })
                .collect()
        })?;
        debug!("event=tag_update module=service status=ok tag_id={id}");
        Ok(true)
    }

    /// Removes tag `id`. Notes keep their reference to it.
    pub fn delete_tag(&mut self, id: &TagId) -> NotebookResult<bool> {
        if self.tag(id).is_none() {
            debug!("event=tag_delete module=service status=skipped reason=not_found tag_id={id}");
            return Ok(false);
        }

        self.tags.update(&mut self.storage, |prev| {
            prev.iter().filter(|tag| tag.id != *id).cloned().collect()
        })?;
        debug!("event=tag_delete module=service status=ok tag_id={id}");
        Ok(true)
    }

    /// Gives back the slot storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn raw_note(&self, id: &NoteId) -> Option<&RawNote> {
        self.notes.get().iter().find(|note| note.id == *id)
    }

    fn push_tag(&mut self, tag: Tag) -> NotebookResult<()> {
        let id = tag.id.clone();
        self.tags.update(&mut self.storage, |prev| {
            let mut next = prev.clone();
            next.push(tag);
            next
        })?;
        debug!("event=tag_create module=service status=ok tag_id={id}");
        Ok(())
    }

    fn stamp(&self) -> ProjectionStamp {
        ProjectionStamp {
            notes_revision: self.notes.revision(),
            tags_revision: self.tags.revision(),
        }
    }
}
