pub mod health;
pub mod identity;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::branches::handlers as branches;
use crate::hierarchy::handlers as hierarchy;
use crate::notes::handlers as notes;
use crate::pull_requests::handlers as pull_requests;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/auth/user", get(identity::handle_current_user))
        // Archive hierarchy
        .route(
            "/api/archives",
            get(hierarchy::handle_list_archives).post(hierarchy::handle_create_archive),
        )
        .route("/api/archives/:archive_id", get(hierarchy::handle_get_archive))
        .route(
            "/api/archives/:archive_id/collections",
            get(hierarchy::handle_list_collections),
        )
        .route("/api/collections", post(hierarchy::handle_create_collection))
        .route(
            "/api/collections/:collection_id",
            get(hierarchy::handle_get_collection),
        )
        .route(
            "/api/collections/:collection_id/boxes",
            get(hierarchy::handle_list_boxes),
        )
        .route("/api/boxes", post(hierarchy::handle_create_box))
        .route("/api/boxes/:box_id/folders", get(hierarchy::handle_list_folders))
        .route("/api/folders", post(hierarchy::handle_create_folder))
        .route("/api/folders/:folder_id", get(hierarchy::handle_get_folder))
        // Branch registry
        .route(
            "/api/collections/:collection_id/branches",
            get(branches::handle_list_branches),
        )
        .route(
            "/api/collections/:collection_id/branches/:name",
            get(branches::handle_get_branch),
        )
        .route("/api/branches", post(branches::handle_create_branch))
        // Notes
        .route(
            "/api/folders/:folder_id/notes/:branch_name",
            get(notes::handle_get_note).put(notes::handle_save_note),
        )
        .route("/api/notes", post(notes::handle_create_note))
        .route("/api/notes/:id", put(notes::handle_update_note))
        .route("/api/search/notes", get(notes::handle_search_notes))
        // Pull requests
        .route(
            "/api/folders/:folder_id/pull-requests",
            get(pull_requests::handle_list_pull_requests),
        )
        .route(
            "/api/pull-requests",
            post(pull_requests::handle_create_pull_request),
        )
        .route(
            "/api/pull-requests/:id",
            get(pull_requests::handle_get_pull_request).patch(pull_requests::handle_update_status),
        )
        .with_state(state)
}
