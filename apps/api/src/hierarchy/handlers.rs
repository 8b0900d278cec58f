use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::hierarchy::service::{
    self, CreateArchiveRequest, CreateBoxRequest, CreateCollectionRequest, CreateFolderRequest,
};
use crate::models::hierarchy::{ArchiveRow, BoxRow, CollectionRow, FolderRow};
use crate::state::AppState;

/// GET /api/archives
pub async fn handle_list_archives(
    State(state): State<AppState>,
) -> Result<Json<Vec<ArchiveRow>>, AppError> {
    Ok(Json(service::list_archives(state.store.as_ref()).await?))
}

/// POST /api/archives
pub async fn handle_create_archive(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateArchiveRequest>,
) -> Result<(StatusCode, Json<ArchiveRow>), AppError> {
    let archive = service::create_archive(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(archive)))
}

/// GET /api/archives/:archive_id
pub async fn handle_get_archive(
    State(state): State<AppState>,
    ValidPath(archive_id): ValidPath<Uuid>,
) -> Result<Json<ArchiveRow>, AppError> {
    Ok(Json(service::get_archive(state.store.as_ref(), archive_id).await?))
}

/// GET /api/archives/:archive_id/collections
pub async fn handle_list_collections(
    State(state): State<AppState>,
    ValidPath(archive_id): ValidPath<Uuid>,
) -> Result<Json<Vec<CollectionRow>>, AppError> {
    Ok(Json(
        service::list_collections(state.store.as_ref(), archive_id).await?,
    ))
}

/// POST /api/collections
pub async fn handle_create_collection(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateCollectionRequest>,
) -> Result<(StatusCode, Json<CollectionRow>), AppError> {
    let collection = service::create_collection(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

/// GET /api/collections/:collection_id
pub async fn handle_get_collection(
    State(state): State<AppState>,
    ValidPath(collection_id): ValidPath<Uuid>,
) -> Result<Json<CollectionRow>, AppError> {
    Ok(Json(
        service::get_collection(state.store.as_ref(), collection_id).await?,
    ))
}

/// GET /api/collections/:collection_id/boxes
pub async fn handle_list_boxes(
    State(state): State<AppState>,
    ValidPath(collection_id): ValidPath<Uuid>,
) -> Result<Json<Vec<BoxRow>>, AppError> {
    Ok(Json(
        service::list_boxes(state.store.as_ref(), collection_id).await?,
    ))
}

/// POST /api/boxes
pub async fn handle_create_box(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateBoxRequest>,
) -> Result<(StatusCode, Json<BoxRow>), AppError> {
    let box_row = service::create_box(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(box_row)))
}

/// GET /api/boxes/:box_id/folders
pub async fn handle_list_folders(
    State(state): State<AppState>,
    ValidPath(box_id): ValidPath<Uuid>,
) -> Result<Json<Vec<FolderRow>>, AppError> {
    Ok(Json(service::list_folders(state.store.as_ref(), box_id).await?))
}

/// POST /api/folders
pub async fn handle_create_folder(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderRow>), AppError> {
    let folder = service::create_folder(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(folder)))
}

/// GET /api/folders/:folder_id
pub async fn handle_get_folder(
    State(state): State<AppState>,
    ValidPath(folder_id): ValidPath<Uuid>,
) -> Result<Json<FolderRow>, AppError> {
    Ok(Json(service::get_folder(state.store.as_ref(), folder_id).await?))
}
