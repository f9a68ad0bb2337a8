//! Note list filtering and list-card summaries.
//!
//! # Responsibility
//! - Filter the joined note view by title text and required tags.
//! - Derive a short plain-text preview from markdown for list cards.
//!
//! # Invariants
//! - Filtering never reorders notes.
//! - A blank title query matches every title.
//! - Tag requirements are conjunctive and checked against resolved tags,
//!   so a dangling tag id never satisfies a requirement.

use crate::model::note::{Note, NoteId};
use crate::model::tag::{Tag, TagId};
use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\([^)]*\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_`#>~\-\[\]\(\)!|]+").expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Filter over the joined note view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Case-insensitive substring of the title.
    pub title: String,
    /// Every listed tag must be attached to the note.
    pub tag_ids: Vec<TagId>,
}

impl NoteQuery {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn tag(mut self, tag_id: TagId) -> Self {
        self.tag_ids.push(tag_id);
        self
    }

    /// Whether `note` satisfies both the title and tag conditions.
    pub fn matches(&self, note: &Note) -> bool {
        let needle = self.title.trim().to_lowercase();
        let title_ok = needle.is_empty() || note.title.to_lowercase().contains(&needle);
        title_ok
            && self
                .tag_ids
                .iter()
                .all(|wanted| note.tags.iter().any(|tag| tag.id == *wanted))
    }
}

/// Returns notes matching `query`, in input order.
pub fn filter_notes<'a>(notes: &'a [Note], query: &NoteQuery) -> Vec<&'a Note> {
    notes.iter().filter(|note| query.matches(note)).collect()
}

/// List-card view of one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub tags: Vec<Tag>,
    /// Plain-text markdown preview; `None` when the body has no text.
    pub preview: Option<String>,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            tags: note.tags.clone(),
            preview: markdown_preview(&note.markdown),
        }
    }
}

/// Reduces markdown to at most 100 characters of plain text.
///
/// Images are dropped, links keep their text, markdown symbols are removed
/// and whitespace runs collapse to one space.
pub fn markdown_preview(markdown: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(markdown, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
