//! Note store operations.
//!
//! A folder holds at most one note per branch name. `create_note` rejects a
//! second note for the same pair with `Conflict`; `save_note` overwrites it.
//! Updates are last-write-wins with no history kept. Branch names are labels
//! and are not checked against the branch registry, so notes may live on
//! branches that were never created (including `main`).

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::NoteRow;
use crate::notes::search::NoteSearch;
use crate::store::{NewNote, ResearchStore};
use crate::validation::{branch_name, required, MAX_NAME_LEN, MAX_TITLE_LEN};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub folder_id: Uuid,
    pub branch_name: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author_id: Option<String>,
}

fn new_note(
    folder_id: Uuid,
    branch: &str,
    title: &str,
    content: String,
    author_id: &str,
) -> Result<NewNote, AppError> {
    Ok(NewNote {
        folder_id,
        branch_name: branch_name("branchName", branch)?,
        title: required("title", title, MAX_TITLE_LEN)?,
        content,
        author_id: required("authorId", author_id, MAX_NAME_LEN)?,
    })
}

pub async fn get_note(
    store: &dyn ResearchStore,
    folder_id: Uuid,
    branch: &str,
) -> Result<NoteRow, AppError> {
    let branch = branch_name("branchName", branch)?;
    store.get_note(folder_id, &branch).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "No note for folder {folder_id} on branch '{branch}'"
        ))
    })
}

pub async fn create_note(
    store: &dyn ResearchStore,
    req: CreateNoteRequest,
    caller_id: &str,
) -> Result<NoteRow, AppError> {
    let author = req.author_id.as_deref().unwrap_or(caller_id);
    let new = new_note(req.folder_id, &req.branch_name, &req.title, req.content, author)?;
    store.create_note(new).await
}

pub async fn update_note(
    store: &dyn ResearchStore,
    note_id: Uuid,
    req: UpdateNoteRequest,
) -> Result<NoteRow, AppError> {
    let title = required("title", &req.title, MAX_TITLE_LEN)?;
    store
        .update_note(note_id, &title, &req.content)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Note {note_id} not found")))
}

pub async fn save_note(
    store: &dyn ResearchStore,
    folder_id: Uuid,
    branch: &str,
    req: SaveNoteRequest,
    caller_id: &str,
) -> Result<NoteRow, AppError> {
    let author = req.author_id.as_deref().unwrap_or(caller_id);
    let new = new_note(folder_id, branch, &req.title, req.content, author)?;
    store.save_note(new).await
}

pub async fn search_notes(
    store: &dyn ResearchStore,
    search: &NoteSearch,
) -> Result<Vec<NoteRow>, AppError> {
    store.search_notes(search).await
}
