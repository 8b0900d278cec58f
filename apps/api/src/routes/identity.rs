use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// GET /api/auth/user
/// Stand-in for a session lookup: always the configured default user.
pub async fn handle_current_user(State(state): State<AppState>) -> Result<Json<UserRow>, AppError> {
    let id = state.default_user_id();
    let user = state
        .store
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    Ok(Json(user))
}
