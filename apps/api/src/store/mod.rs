//! Persistence seam for the archive hierarchy, branches, notes and pull requests.
//!
//! `AppState` holds an `Arc<dyn ResearchStore>`: `PgStore` in production,
//! `MemoryStore` for tests and the in-memory demo backend.
//!
//! Inputs reaching a store have already passed field validation. Stores own
//! the invariants that need atomicity:
//! - one branch name per collection (`AppError::Conflict`)
//! - one note per (folder, branch name) (`AppError::Conflict`)
//! - parents must exist (`AppError::NotFound`)
//! - pull request status moves via compare-and-set on the current status

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::{BranchRow, NoteRow, PullRequestRow};
use crate::models::hierarchy::{ArchiveRow, BoxRow, CollectionRow, FolderRow};
use crate::models::user::{UpsertUser, UserRow};
use crate::notes::search::NoteSearch;
use crate::pull_requests::status::PullRequestStatus;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone)]
pub struct NewArchive {
    pub name: String,
    pub institution: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCollection {
    pub archive_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBox {
    pub collection_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFolder {
    pub box_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBranch {
    pub collection_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parent_branch: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone)]
pub struct NewNote {
    pub folder_id: Uuid,
    pub branch_name: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

#[derive(Debug, Clone)]
pub struct NewPullRequest {
    pub folder_id: Uuid,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: Option<String>,
    pub author_id: String,
}

#[async_trait]
pub trait ResearchStore: Send + Sync {
    // Identity
    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, AppError>;
    async fn upsert_user(&self, user: UpsertUser) -> Result<UserRow, AppError>;

    // Archive hierarchy. Lists are ordered by name.
    async fn list_archives(&self) -> Result<Vec<ArchiveRow>, AppError>;
    async fn get_archive(&self, id: Uuid) -> Result<Option<ArchiveRow>, AppError>;
    async fn create_archive(&self, new: NewArchive) -> Result<ArchiveRow, AppError>;

    async fn list_collections(&self, archive_id: Uuid) -> Result<Vec<CollectionRow>, AppError>;
    async fn get_collection(&self, id: Uuid) -> Result<Option<CollectionRow>, AppError>;
    async fn create_collection(&self, new: NewCollection) -> Result<CollectionRow, AppError>;

    async fn list_boxes(&self, collection_id: Uuid) -> Result<Vec<BoxRow>, AppError>;
    async fn get_box(&self, id: Uuid) -> Result<Option<BoxRow>, AppError>;
    async fn create_box(&self, new: NewBox) -> Result<BoxRow, AppError>;

    async fn list_folders(&self, box_id: Uuid) -> Result<Vec<FolderRow>, AppError>;
    async fn get_folder(&self, id: Uuid) -> Result<Option<FolderRow>, AppError>;
    async fn create_folder(&self, new: NewFolder) -> Result<FolderRow, AppError>;

    // Branch registry
    async fn list_branches(&self, collection_id: Uuid) -> Result<Vec<BranchRow>, AppError>;
    async fn get_branch(
        &self,
        collection_id: Uuid,
        name: &str,
    ) -> Result<Option<BranchRow>, AppError>;
    async fn create_branch(&self, new: NewBranch) -> Result<BranchRow, AppError>;

    // Notes
    async fn get_note(
        &self,
        folder_id: Uuid,
        branch_name: &str,
    ) -> Result<Option<NoteRow>, AppError>;
    /// Fails with `Conflict` when the (folder, branch) pair already has a note.
    async fn create_note(&self, new: NewNote) -> Result<NoteRow, AppError>;
    /// Overwrites title and content. `None` when the id is unknown.
    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<NoteRow>, AppError>;
    /// Atomic insert-or-overwrite for the (folder, branch) pair. The original
    /// author is kept on overwrite.
    async fn save_note(&self, new: NewNote) -> Result<NoteRow, AppError>;
    /// Newest `updated_at` first.
    async fn search_notes(&self, search: &NoteSearch) -> Result<Vec<NoteRow>, AppError>;

    // Pull requests
    /// Newest `created_at` first.
    async fn list_pull_requests(&self, folder_id: Uuid) -> Result<Vec<PullRequestRow>, AppError>;
    async fn get_pull_request(&self, id: Uuid) -> Result<Option<PullRequestRow>, AppError>;
    async fn create_pull_request(&self, new: NewPullRequest)
        -> Result<PullRequestRow, AppError>;
    /// Sets `to` only while the row is still in `from`. `None` when the id is
    /// unknown or the status has already moved.
    async fn transition_pull_request(
        &self,
        id: Uuid,
        from: PullRequestStatus,
        to: PullRequestStatus,
        reviewer_id: Option<&str>,
    ) -> Result<Option<PullRequestRow>, AppError>;
}
