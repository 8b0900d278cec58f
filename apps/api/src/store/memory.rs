use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::{AppError, BRANCH_EXISTS, NOTE_EXISTS};
use crate::models::annotation::{BranchRow, NoteRow, PullRequestRow};
use crate::models::hierarchy::{ArchiveRow, BoxRow, CollectionRow, FolderRow};
use crate::models::user::{UpsertUser, UserRow};
use crate::notes::search::NoteSearch;
use crate::pull_requests::status::PullRequestStatus;

use super::{
    NewArchive, NewBox, NewBranch, NewCollection, NewFolder, NewNote, NewPullRequest,
    ResearchStore,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    archives: Vec<ArchiveRow>,
    collections: Vec<CollectionRow>,
    boxes: Vec<BoxRow>,
    folders: Vec<FolderRow>,
    branches: Vec<BranchRow>,
    notes: Vec<NoteRow>,
    pull_requests: Vec<PullRequestRow>,
}

impl Tables {
    fn require_user(&self, id: &str) -> Result<(), AppError> {
        if self.users.iter().any(|u| u.id == id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("User {id} not found")))
        }
    }

    fn require_folder(&self, id: Uuid) -> Result<(), AppError> {
        if self.folders.iter().any(|f| f.id == id) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Folder {id} not found")))
        }
    }

    /// Walks folder → box → collection to the owning archive.
    fn archive_of_folder(&self, folder_id: Uuid) -> Option<Uuid> {
        let folder = self.folders.iter().find(|f| f.id == folder_id)?;
        let box_row = self.boxes.iter().find(|b| b.id == folder.box_id)?;
        let collection = self
            .collections
            .iter()
            .find(|c| c.id == box_row.collection_id)?;
        Some(collection.archive_id)
    }
}

/// In-process `ResearchStore`. Every call takes the table lock once, so the
/// check-then-write sequences below are atomic with respect to other calls.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Byte order, matching `COLLATE "C"` in `PgStore`.
fn sorted_by_name<T>(rows: impl Iterator<Item = T>, name: impl Fn(&T) -> &str) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| name(a).cmp(name(b)));
    rows
}

#[async_trait]
impl ResearchStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<UserRow, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &user.email {
            if tables
                .users
                .iter()
                .any(|u| u.id != user.id && u.email.as_deref() == Some(email.as_str()))
            {
                return Err(AppError::Conflict("Record already exists".to_string()));
            }
        }

        let now = Utc::now();
        if let Some(existing) = tables.users.iter_mut().find(|u| u.id == user.id) {
            existing.email = user.email;
            existing.first_name = user.first_name;
            existing.last_name = user.last_name;
            existing.profile_image_url = user.profile_image_url;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = UserRow {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image_url: user.profile_image_url,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn list_archives(&self) -> Result<Vec<ArchiveRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(tables.archives.iter().cloned(), |a| a.name.as_str()))
    }

    async fn get_archive(&self, id: Uuid) -> Result<Option<ArchiveRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.archives.iter().find(|a| a.id == id).cloned())
    }

    async fn create_archive(&self, new: NewArchive) -> Result<ArchiveRow, AppError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let row = ArchiveRow {
            id: Uuid::new_v4(),
            name: new.name,
            institution: new.institution,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        tables.archives.push(row.clone());
        Ok(row)
    }

    async fn list_collections(&self, archive_id: Uuid) -> Result<Vec<CollectionRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables
                .collections
                .iter()
                .filter(|c| c.archive_id == archive_id)
                .cloned(),
            |c| c.name.as_str(),
        ))
    }

    async fn get_collection(&self, id: Uuid) -> Result<Option<CollectionRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.collections.iter().find(|c| c.id == id).cloned())
    }

    async fn create_collection(&self, new: NewCollection) -> Result<CollectionRow, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.archives.iter().any(|a| a.id == new.archive_id) {
            return Err(AppError::NotFound(format!(
                "Archive {} not found",
                new.archive_id
            )));
        }
        let now = Utc::now();
        let row = CollectionRow {
            id: Uuid::new_v4(),
            archive_id: new.archive_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        tables.collections.push(row.clone());
        Ok(row)
    }

    async fn list_boxes(&self, collection_id: Uuid) -> Result<Vec<BoxRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables
                .boxes
                .iter()
                .filter(|b| b.collection_id == collection_id)
                .cloned(),
            |b| b.name.as_str(),
        ))
    }

    async fn get_box(&self, id: Uuid) -> Result<Option<BoxRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.boxes.iter().find(|b| b.id == id).cloned())
    }

    async fn create_box(&self, new: NewBox) -> Result<BoxRow, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.collections.iter().any(|c| c.id == new.collection_id) {
            return Err(AppError::NotFound(format!(
                "Collection {} not found",
                new.collection_id
            )));
        }
        let now = Utc::now();
        let row = BoxRow {
            id: Uuid::new_v4(),
            collection_id: new.collection_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        tables.boxes.push(row.clone());
        Ok(row)
    }

    async fn list_folders(&self, box_id: Uuid) -> Result<Vec<FolderRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables.folders.iter().filter(|f| f.box_id == box_id).cloned(),
            |f| f.name.as_str(),
        ))
    }

    async fn get_folder(&self, id: Uuid) -> Result<Option<FolderRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.folders.iter().find(|f| f.id == id).cloned())
    }

    async fn create_folder(&self, new: NewFolder) -> Result<FolderRow, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.boxes.iter().any(|b| b.id == new.box_id) {
            return Err(AppError::NotFound(format!("Box {} not found", new.box_id)));
        }
        let now = Utc::now();
        let row = FolderRow {
            id: Uuid::new_v4(),
            box_id: new.box_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        tables.folders.push(row.clone());
        Ok(row)
    }

    async fn list_branches(&self, collection_id: Uuid) -> Result<Vec<BranchRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables
                .branches
                .iter()
                .filter(|b| b.collection_id == collection_id)
                .cloned(),
            |b| b.name.as_str(),
        ))
    }

    async fn get_branch(
        &self,
        collection_id: Uuid,
        name: &str,
    ) -> Result<Option<BranchRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .branches
            .iter()
            .find(|b| b.collection_id == collection_id && b.name == name)
            .cloned())
    }

    async fn create_branch(&self, new: NewBranch) -> Result<BranchRow, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.collections.iter().any(|c| c.id == new.collection_id) {
            return Err(AppError::NotFound(format!(
                "Collection {} not found",
                new.collection_id
            )));
        }
        tables.require_user(&new.created_by)?;
        if tables
            .branches
            .iter()
            .any(|b| b.collection_id == new.collection_id && b.name == new.name)
        {
            return Err(AppError::Conflict(BRANCH_EXISTS.to_string()));
        }

        let now = Utc::now();
        let row = BranchRow {
            id: Uuid::new_v4(),
            collection_id: new.collection_id,
            name: new.name,
            description: new.description,
            parent_branch: new.parent_branch,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.branches.push(row.clone());
        Ok(row)
    }

    async fn get_note(
        &self,
        folder_id: Uuid,
        branch_name: &str,
    ) -> Result<Option<NoteRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .find(|n| n.folder_id == folder_id && n.branch_name == branch_name)
            .cloned())
    }

    async fn create_note(&self, new: NewNote) -> Result<NoteRow, AppError> {
        let mut tables = self.tables.write().await;
        tables.require_folder(new.folder_id)?;
        tables.require_user(&new.author_id)?;
        if tables
            .notes
            .iter()
            .any(|n| n.folder_id == new.folder_id && n.branch_name == new.branch_name)
        {
            return Err(AppError::Conflict(NOTE_EXISTS.to_string()));
        }

        let now = Utc::now();
        let row = NoteRow {
            id: Uuid::new_v4(),
            folder_id: new.folder_id,
            branch_name: new.branch_name,
            title: new.title,
            content: new.content,
            author_id: new.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.notes.push(row.clone());
        Ok(row)
    }

    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<NoteRow>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.notes.iter_mut().find(|n| n.id == id).map(|note| {
            note.title = title.to_string();
            note.content = content.to_string();
            note.updated_at = Utc::now();
            note.clone()
        }))
    }

    async fn save_note(&self, new: NewNote) -> Result<NoteRow, AppError> {
        let mut tables = self.tables.write().await;
        tables.require_folder(new.folder_id)?;

        let now = Utc::now();
        if let Some(note) = tables
            .notes
            .iter_mut()
            .find(|n| n.folder_id == new.folder_id && n.branch_name == new.branch_name)
        {
            note.title = new.title;
            note.content = new.content;
            note.updated_at = now;
            return Ok(note.clone());
        }

        // The author is only written on insert.
        tables.require_user(&new.author_id)?;
        let row = NoteRow {
            id: Uuid::new_v4(),
            folder_id: new.folder_id,
            branch_name: new.branch_name,
            title: new.title,
            content: new.content,
            author_id: new.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.notes.push(row.clone());
        Ok(row)
    }

    async fn search_notes(&self, search: &NoteSearch) -> Result<Vec<NoteRow>, AppError> {
        let tables = self.tables.read().await;
        let mut hits: Vec<(usize, &NoteRow)> = tables
            .notes
            .iter()
            .enumerate()
            .filter(|(_, n)| search.matches_text(n) && search.matches_branch(n))
            .filter(|(_, n)| {
                search
                    .archive_id
                    .map_or(true, |archive| tables.archive_of_folder(n.folder_id) == Some(archive))
            })
            .collect();
        hits.sort_by(|(ia, a), (ib, b)| b.updated_at.cmp(&a.updated_at).then(ib.cmp(ia)));
        Ok(hits.into_iter().map(|(_, n)| n.clone()).collect())
    }

    async fn list_pull_requests(&self, folder_id: Uuid) -> Result<Vec<PullRequestRow>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<(usize, &PullRequestRow)> = tables
            .pull_requests
            .iter()
            .enumerate()
            .filter(|(_, pr)| pr.folder_id == folder_id)
            .collect();
        rows.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(rows.into_iter().map(|(_, pr)| pr.clone()).collect())
    }

    async fn get_pull_request(&self, id: Uuid) -> Result<Option<PullRequestRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.pull_requests.iter().find(|pr| pr.id == id).cloned())
    }

    async fn create_pull_request(
        &self,
        new: NewPullRequest,
    ) -> Result<PullRequestRow, AppError> {
        let mut tables = self.tables.write().await;
        tables.require_folder(new.folder_id)?;
        tables.require_user(&new.author_id)?;

        let now = Utc::now();
        let row = PullRequestRow {
            id: Uuid::new_v4(),
            folder_id: new.folder_id,
            source_branch: new.source_branch,
            target_branch: new.target_branch,
            title: new.title,
            description: new.description,
            author_id: new.author_id,
            status: PullRequestStatus::Open,
            reviewer_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.pull_requests.push(row.clone());
        Ok(row)
    }

    async fn transition_pull_request(
        &self,
        id: Uuid,
        from: PullRequestStatus,
        to: PullRequestStatus,
        reviewer_id: Option<&str>,
    ) -> Result<Option<PullRequestRow>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables
            .pull_requests
            .iter()
            .position(|pr| pr.id == id && pr.status == from)
        else {
            return Ok(None);
        };
        if let Some(reviewer) = reviewer_id {
            tables.require_user(reviewer)?;
        }

        let pr = &mut tables.pull_requests[idx];
        pr.status = to;
        if let Some(reviewer) = reviewer_id {
            pr.reviewer_id = Some(reviewer.to_string());
        }
        pr.updated_at = Utc::now();
        Ok(Some(pr.clone()))
    }
}
