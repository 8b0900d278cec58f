//! Branch registry: named annotation lenses scoped to a collection.
//!
//! Branch names are case-sensitive and unique within a collection. The
//! default branch `main` exists implicitly in every collection and is never
//! stored, so it cannot be created. `parent_branch` is a free-text label and
//! is not checked against existing branches.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::BranchRow;
use crate::store::{NewBranch, ResearchStore};
use crate::validation::{branch_name, optional, required, MAX_BRANCH_LEN, MAX_NAME_LEN};

pub const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBranchRequest {
    pub collection_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `main` when absent.
    pub parent_branch: Option<String>,
    /// Filled from the caller's identity when absent.
    pub created_by: Option<String>,
}

pub async fn list_branches(
    store: &dyn ResearchStore,
    collection_id: Uuid,
) -> Result<Vec<BranchRow>, AppError> {
    store.list_branches(collection_id).await
}

pub async fn get_branch(
    store: &dyn ResearchStore,
    collection_id: Uuid,
    name: &str,
) -> Result<BranchRow, AppError> {
    let name = branch_name("name", name)?;
    store
        .get_branch(collection_id, &name)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Branch '{name}' not found in collection {collection_id}"
            ))
        })
}

pub async fn create_branch(
    store: &dyn ResearchStore,
    req: CreateBranchRequest,
    caller_id: &str,
) -> Result<BranchRow, AppError> {
    let name = branch_name("name", &req.name)?;
    if name == DEFAULT_BRANCH {
        return Err(AppError::Conflict(format!(
            "'{DEFAULT_BRANCH}' is the implicit default branch and cannot be created"
        )));
    }
    let parent_branch = optional(
        "parentBranch",
        req.parent_branch.as_deref(),
        Some(MAX_BRANCH_LEN),
    )?
    .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
    let created_by = required(
        "createdBy",
        req.created_by.as_deref().unwrap_or(caller_id),
        MAX_NAME_LEN,
    )?;

    store
        .create_branch(NewBranch {
            collection_id: req.collection_id,
            name,
            description: optional("description", req.description.as_deref(), None)?,
            parent_branch: Some(parent_branch),
            created_by,
        })
        .await
}
