//! `notebook` command-line front end over `notebook_core`.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, NoteFields};
use log::info;
use notebook_core::{
    init_logging, LoggingConfig, Note, NoteData, NoteId, NoteQuery, Notebook, NotebookConfig,
    SlotStorage, SqliteSlotStorage, Tag, TagId,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    if let Some(logging) = config.logging.as_ref() {
        init_logging(logging).context("failed to initialize logging")?;
    }

    let storage = SqliteSlotStorage::open(&cli.db)
        .with_context(|| format!("failed to open `{}`", cli.db.display()))?;
    let mut notebook = Notebook::open_with_config(storage, &config)?;
    for key in notebook.recovered_slots() {
        eprintln!("warning: slot `{key}` was unreadable and has been reset to empty");
    }

    run(&mut notebook, cli.command)
}

fn load_config(cli: &Cli) -> Result<NotebookConfig> {
    let mut config = match cli.config.as_ref() {
        Some(path) => NotebookConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => NotebookConfig::default(),
    };
    if let Some(dir) = cli.log_dir.as_ref() {
        let level = config
            .logging
            .as_ref()
            .map(|logging| logging.level.clone())
            .unwrap_or_else(|| notebook_core::default_log_level().to_string());
        config.logging = Some(LoggingConfig::new(level, dir.as_str()));
    }
    Ok(config)
}

fn run<S: SlotStorage>(notebook: &mut Notebook<S>, command: Command) -> Result<()> {
    match command {
        Command::List { title, tags } => {
            let Some(tag_ids) = resolve_existing(notebook, &tags) else {
                return Ok(());
            };
            let query = NoteQuery {
                title: title.unwrap_or_default(),
                tag_ids,
            };
            for summary in notebook.search(&query) {
                println!("{}  {}{}", summary.id, summary.title, format_labels(&summary.tags));
                if let Some(preview) = summary.preview {
                    println!("    {preview}");
                }
            }
        }
        Command::Show { id } => {
            let id: NoteId = parse_id(&id)?;
            match notebook.note(&id) {
                Some(note) => print_note(&note),
                None => bail!("no note with id {id}"),
            }
        }
        Command::New { fields } => {
            let data = note_data(notebook, fields)?;
            let id = notebook.create_note(data)?;
            info!("event=cli_command module=cli status=ok command=new note_id={id}");
            println!("{id}");
        }
        Command::Edit { id, fields } => {
            let id: NoteId = parse_id(&id)?;
            if notebook.note(&id).is_none() {
                bail!("no note with id {id}");
            }
            let data = note_data(notebook, fields)?;
            notebook.update_note(&id, data)?;
        }
        Command::Rm { id } => {
            let id: NoteId = parse_id(&id)?;
            if !notebook.delete_note(&id)? {
                eprintln!("note {id} was already gone");
            }
        }
        Command::Tags => {
            for tag in notebook.tags() {
                println!("{}  {}", tag.id, tag.label);
            }
        }
        Command::TagAdd { label } => {
            let tag = notebook.create_tag(required("tag label", &label)?)?;
            println!("{}", tag.id);
        }
        Command::TagRename { id, label } => {
            let id: TagId = parse_id(&id)?;
            if notebook.tag(&id).is_none() {
                bail!("no tag with id {id}");
            }
            notebook.update_tag(&id, required("tag label", &label)?)?;
        }
        Command::TagRm { id } => {
            let id: TagId = parse_id(&id)?;
            if !notebook.delete_tag(&id)? {
                eprintln!("tag {id} was already gone");
            }
        }
    }
    Ok(())
}

/// Builds note input, creating tags for labels the store does not know yet.
///
/// Every field is checked before the first tag is created.
fn note_data<S: SlotStorage>(notebook: &mut Notebook<S>, fields: NoteFields) -> Result<NoteData> {
    let title = required("title", &fields.title)?.to_string();
    let labels = fields
        .tags
        .iter()
        .map(|label| required("tag label", label))
        .collect::<Result<Vec<_>>>()?;

    let mut tags: Vec<Tag> = Vec::with_capacity(labels.len());
    for label in labels {
        let tag = match find_by_label(notebook, label) {
            Some(tag) => tag,
            None => notebook.create_tag(label)?,
        };
        if !tags.iter().any(|known| known.id == tag.id) {
            tags.push(tag);
        }
    }
    Ok(NoteData::new(title, fields.body, tags))
}

/// Maps labels to ids; `None` when any label is unknown.
fn resolve_existing<S: SlotStorage>(
    notebook: &Notebook<S>,
    labels: &[String],
) -> Option<Vec<TagId>> {
    labels
        .iter()
        .map(|label| find_by_label(notebook, label).map(|tag| tag.id))
        .collect()
}

fn find_by_label<S: SlotStorage>(notebook: &Notebook<S>, label: &str) -> Option<Tag> {
    let wanted = label.trim();
    notebook
        .tags()
        .iter()
        .find(|tag| tag.label == wanted)
        .cloned()
}

fn parse_id<I: From<String>>(raw: &str) -> Result<I> {
    let id = raw.trim();
    if id.is_empty() {
        bail!("id cannot be blank");
    }
    Ok(I::from(id.to_string()))
}

/// Trimmed command-line value; blank values are refused like an empty form field.
fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{field} cannot be blank");
    }
    Ok(trimmed)
}

fn format_labels(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let labels: Vec<&str> = tags.iter().map(|tag| tag.label.as_str()).collect();
    format!("  [{}]", labels.join(", "))
}

fn print_note(note: &Note) {
    println!("# {}{}", note.title, format_labels(&note.tags));
    println!("id: {}", note.id);
    if !note.markdown.is_empty() {
        println!();
        println!("{}", note.markdown);
    }
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::cli::Cli;
    use clap::Parser;
    use notebook_core::{MemorySlotStorage, NoteData, Notebook};

    fn exec(notebook: &mut Notebook<MemorySlotStorage>, args: &[&str]) -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(std::iter::once("notebook").chain(args.iter().copied()))
            .unwrap();
        run(notebook, cli.command)
    }

    #[test]
    fn edit_of_unknown_note_creates_no_tags() {
        let mut notebook = Notebook::open(MemorySlotStorage::new()).unwrap();
        let err = exec(
            &mut notebook,
            &["edit", "nope", "--title", "x", "--tag", "fresh"],
        )
        .unwrap_err();

        assert!(err.to_string().contains("no note with id nope"));
        assert!(notebook.tags().is_empty());
        assert_eq!(notebook.storage().write_count(), 0);
    }

    #[test]
    fn blank_title_is_refused_before_tags_are_created() {
        let mut notebook = Notebook::open(MemorySlotStorage::new()).unwrap();
        let id = notebook
            .create_note(NoteData::new("kept", "", Vec::new()))
            .unwrap();
        let writes = notebook.storage().write_count();

        assert!(exec(&mut notebook, &["new", "--title", " ", "--tag", "fresh"]).is_err());
        assert!(exec(
            &mut notebook,
            &["edit", id.as_str(), "--title", "", "--tag", "fresh"],
        )
        .is_err());

        assert!(notebook.tags().is_empty());
        assert_eq!(notebook.storage().write_count(), writes);
        assert_eq!(notebook.note(&id).unwrap().title, "kept");
    }

    #[test]
    fn new_creates_unknown_labels_inline() {
        let mut notebook = Notebook::open(MemorySlotStorage::new()).unwrap();
        exec(&mut notebook, &["tag-add", "work"]).unwrap();
        exec(
            &mut notebook,
            &["new", "--title", "Plan", "--tag", "work", "--tag", "q3"],
        )
        .unwrap();

        let labels: Vec<&str> = notebook.tags().iter().map(|tag| tag.label.as_str()).collect();
        assert_eq!(labels, vec!["work", "q3"]);
        let notes = notebook.notes();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].tags.len(), 2);
    }
}
