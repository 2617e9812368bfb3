//! Note CRUD orchestration and Markdown rendering.

use std::sync::Arc;

use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use tracing::debug;

use notesync_core::ids::is_note_id;
use notesync_core::{
    CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest,
};

/// A note rendered to HTML for display.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedNote {
    pub id: String,
    pub title: String,
    pub html_content: String,
}

/// Orchestrates the note repository behind the CRUD contract.
///
/// Field-presence validation happens here, before storage is touched;
/// ownership checks and timestamp management stay in the repository.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    fn validate_id(id: &str) -> Result<()> {
        if is_note_id(id) {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!("Malformed note id: {id}")))
        }
    }

    pub async fn create(
        &self,
        owner_id: i64,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<Note> {
        self.notes
            .insert(CreateNoteRequest {
                owner_id,
                title,
                content,
            })
            .await
    }

    pub async fn list(&self, owner_id: i64) -> Result<Vec<Note>> {
        self.notes.list(owner_id).await
    }

    pub async fn get(&self, id: &str, owner_id: i64) -> Result<Note> {
        Self::validate_id(id)?;
        self.notes.fetch(id, owner_id).await
    }

    pub async fn update(&self, id: &str, owner_id: i64, req: UpdateNoteRequest) -> Result<Note> {
        Self::validate_id(id)?;
        self.notes.update(id, owner_id, req).await
    }

    pub async fn delete(&self, id: &str, owner_id: i64) -> Result<()> {
        Self::validate_id(id)?;
        self.notes.delete(id, owner_id).await
    }

    /// Fetch a note through the owner-scoped path and render its
    /// Markdown body to HTML.
    pub async fn render_html(&self, id: &str, owner_id: i64) -> Result<RenderedNote> {
        let note = self.get(id, owner_id).await?;
        let rendered = render_markdown(&note.content);

        debug!(
            subsystem = "api",
            component = "notes",
            op = "render_html",
            note_id = %note.id,
            "Note rendered"
        );
        Ok(RenderedNote {
            id: note.id,
            title: note.title,
            html_content: rendered,
        })
    }
}

/// Render Markdown to HTML with the common extensions enabled.
fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
