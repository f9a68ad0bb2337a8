//! Command-line schema for the `notebook` binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Notes with tags, kept in a local SQLite slot store.
#[derive(Parser, Debug)]
#[command(name = "notebook", version, about)]
pub struct Cli {
    /// Slot database file.
    #[arg(long, global = true, default_value = "notebook.sqlite3")]
    pub db: PathBuf,

    /// JSON config file (slot keys, corrupt-slot policy, logging).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Absolute directory for rolling log files; overrides the config file.
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes, optionally filtered by title text and tag labels.
    List {
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Print one note.
    Show { id: String },
    /// Create a note. Unknown tag labels are created on the fly.
    New {
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Replace title, body and tags of a note.
    Edit {
        id: String,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Delete a note.
    Rm { id: String },
    /// List tags.
    Tags,
    /// Create a tag.
    TagAdd { label: String },
    /// Relabel a tag.
    TagRename { id: String, label: String },
    /// Delete a tag. Notes keep no visible reference to it.
    TagRm { id: String },
}

#[derive(clap::Args, Debug)]
pub struct NoteFields {
    #[arg(long)]
    pub title: String,
    /// Markdown body.
    #[arg(long, default_value = "")]
    pub body: String,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}
