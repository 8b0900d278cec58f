use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::models::annotation::PullRequestRow;
use crate::pull_requests::tracker::{self, CreatePullRequestRequest, UpdateStatusRequest};
use crate::state::AppState;

/// GET /api/folders/:folder_id/pull-requests
pub async fn handle_list_pull_requests(
    State(state): State<AppState>,
    ValidPath(folder_id): ValidPath<Uuid>,
) -> Result<Json<Vec<PullRequestRow>>, AppError> {
    Ok(Json(
        tracker::list_pull_requests(state.store.as_ref(), folder_id).await?,
    ))
}

/// POST /api/pull-requests
pub async fn handle_create_pull_request(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreatePullRequestRequest>,
) -> Result<(StatusCode, Json<PullRequestRow>), AppError> {
    let pr =
        tracker::create_pull_request(state.store.as_ref(), req, state.default_user_id()).await?;
    Ok((StatusCode::CREATED, Json(pr)))
}

/// GET /api/pull-requests/:id
pub async fn handle_get_pull_request(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<PullRequestRow>, AppError> {
    Ok(Json(tracker::get_pull_request(state.store.as_ref(), id).await?))
}

/// PATCH /api/pull-requests/:id
/// The reviewer defaults to the caller when the body omits one.
pub async fn handle_update_status(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateStatusRequest>,
) -> Result<Json<PullRequestRow>, AppError> {
    let reviewer = req
        .reviewer_id
        .as_deref()
        .unwrap_or(state.default_user_id());
    let pr = tracker::update_status(state.store.as_ref(), id, &req.status, Some(reviewer)).await?;
    Ok(Json(pr))
}
