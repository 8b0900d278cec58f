use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath, ValidQuery};
use crate::models::annotation::NoteRow;
use crate::notes::search::NoteSearch;
use crate::notes::service::{self, CreateNoteRequest, SaveNoteRequest, UpdateNoteRequest};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub archive_id: Option<String>,
    pub branch_name: Option<String>,
}

/// GET /api/folders/:folder_id/notes/:branch_name
pub async fn handle_get_note(
    State(state): State<AppState>,
    ValidPath((folder_id, branch_name)): ValidPath<(Uuid, String)>,
) -> Result<Json<NoteRow>, AppError> {
    Ok(Json(
        service::get_note(state.store.as_ref(), folder_id, &branch_name).await?,
    ))
}

/// PUT /api/folders/:folder_id/notes/:branch_name
/// Creates the note for the pair or overwrites the existing one.
pub async fn handle_save_note(
    State(state): State<AppState>,
    ValidPath((folder_id, branch_name)): ValidPath<(Uuid, String)>,
    ValidJson(req): ValidJson<SaveNoteRequest>,
) -> Result<Json<NoteRow>, AppError> {
    let note = service::save_note(
        state.store.as_ref(),
        folder_id,
        &branch_name,
        req,
        state.default_user_id(),
    )
    .await?;
    Ok(Json(note))
}

/// POST /api/notes
pub async fn handle_create_note(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteRow>), AppError> {
    let note = service::create_note(state.store.as_ref(), req, state.default_user_id()).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/:id
pub async fn handle_update_note(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateNoteRequest>,
) -> Result<Json<NoteRow>, AppError> {
    Ok(Json(service::update_note(state.store.as_ref(), id, req).await?))
}

/// GET /api/search/notes?query=&archiveId=&branchName=
pub async fn handle_search_notes(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<SearchParams>,
) -> Result<Json<Vec<NoteRow>>, AppError> {
    let search = NoteSearch::new(
        params.query.as_deref(),
        params.archive_id.as_deref(),
        params.branch_name.as_deref(),
    )?;
    Ok(Json(service::search_notes(state.store.as_ref(), &search).await?))
}
