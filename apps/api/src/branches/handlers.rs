use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::branches::registry::{self, CreateBranchRequest};
use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::models::annotation::BranchRow;
use crate::state::AppState;

/// GET /api/collections/:collection_id/branches
pub async fn handle_list_branches(
    State(state): State<AppState>,
    ValidPath(collection_id): ValidPath<Uuid>,
) -> Result<Json<Vec<BranchRow>>, AppError> {
    Ok(Json(
        registry::list_branches(state.store.as_ref(), collection_id).await?,
    ))
}

/// GET /api/collections/:collection_id/branches/:name
pub async fn handle_get_branch(
    State(state): State<AppState>,
    ValidPath((collection_id, name)): ValidPath<(Uuid, String)>,
) -> Result<Json<BranchRow>, AppError> {
    Ok(Json(
        registry::get_branch(state.store.as_ref(), collection_id, &name).await?,
    ))
}

/// POST /api/branches
pub async fn handle_create_branch(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateBranchRequest>,
) -> Result<(StatusCode, Json<BranchRow>), AppError> {
    let branch =
        registry::create_branch(state.store.as_ref(), req, state.default_user_id()).await?;
    Ok((StatusCode::CREATED, Json(branch)))
}
