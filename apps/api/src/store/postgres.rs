use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::{BranchRow, NoteRow, PullRequestRow};
use crate::models::hierarchy::{ArchiveRow, BoxRow, CollectionRow, FolderRow};
use crate::models::user::{UpsertUser, UserRow};
use crate::notes::search::NoteSearch;
use crate::pull_requests::status::PullRequestStatus;

use super::{
    NewArchive, NewBox, NewBranch, NewCollection, NewFolder, NewNote, NewPullRequest,
    ResearchStore,
};

// Names sort by byte order so results do not depend on the database
// collation and match `MemoryStore`.
const LIST_ARCHIVES: &str = r#"SELECT * FROM archives ORDER BY name COLLATE "C""#;
const LIST_COLLECTIONS: &str =
    r#"SELECT * FROM collections WHERE archive_id = $1 ORDER BY name COLLATE "C""#;
const LIST_BOXES: &str =
    r#"SELECT * FROM boxes WHERE collection_id = $1 ORDER BY name COLLATE "C""#;
const LIST_FOLDERS: &str = r#"SELECT * FROM folders WHERE box_id = $1 ORDER BY name COLLATE "C""#;
const LIST_BRANCHES: &str =
    r#"SELECT * FROM branches WHERE collection_id = $1 ORDER BY name COLLATE "C""#;

/// PostgreSQL implementation of `ResearchStore`.
///
/// Uniqueness and parent existence are enforced by the schema; the
/// constraint violations are translated by `From<sqlx::Error> for AppError`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResearchStore for PgStore {
    async fn get_user(&self, id: &str) -> Result<Option<UserRow>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn upsert_user(&self, user: UpsertUser) -> Result<UserRow, AppError> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .bind(now)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_archives(&self) -> Result<Vec<ArchiveRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ArchiveRow>(LIST_ARCHIVES)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_archive(&self, id: Uuid) -> Result<Option<ArchiveRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ArchiveRow>("SELECT * FROM archives WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_archive(&self, new: NewArchive) -> Result<ArchiveRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, ArchiveRow>(
            r#"
            INSERT INTO archives (id, name, institution, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.institution)
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Created archive {} ({})", row.id, row.name);
        Ok(row)
    }

    async fn list_collections(&self, archive_id: Uuid) -> Result<Vec<CollectionRow>, AppError> {
        Ok(sqlx::query_as::<_, CollectionRow>(
            LIST_COLLECTIONS,
        )
        .bind(archive_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_collection(&self, id: Uuid) -> Result<Option<CollectionRow>, AppError> {
        Ok(
            sqlx::query_as::<_, CollectionRow>("SELECT * FROM collections WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_collection(&self, new: NewCollection) -> Result<CollectionRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, CollectionRow>(
            r#"
            INSERT INTO collections (id, archive_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.archive_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Created collection {} in archive {}", row.id, row.archive_id);
        Ok(row)
    }

    async fn list_boxes(&self, collection_id: Uuid) -> Result<Vec<BoxRow>, AppError> {
        Ok(sqlx::query_as::<_, BoxRow>(
            LIST_BOXES,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_box(&self, id: Uuid) -> Result<Option<BoxRow>, AppError> {
        Ok(sqlx::query_as::<_, BoxRow>("SELECT * FROM boxes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_box(&self, new: NewBox) -> Result<BoxRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, BoxRow>(
            r#"
            INSERT INTO boxes (id, collection_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.collection_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Created box {} in collection {}", row.id, row.collection_id);
        Ok(row)
    }

    async fn list_folders(&self, box_id: Uuid) -> Result<Vec<FolderRow>, AppError> {
        Ok(
            sqlx::query_as::<_, FolderRow>(LIST_FOLDERS)
                .bind(box_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_folder(&self, id: Uuid) -> Result<Option<FolderRow>, AppError> {
        Ok(
            sqlx::query_as::<_, FolderRow>("SELECT * FROM folders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_folder(&self, new: NewFolder) -> Result<FolderRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, FolderRow>(
            r#"
            INSERT INTO folders (id, box_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.box_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!("Created folder {} in box {}", row.id, row.box_id);
        Ok(row)
    }

    async fn list_branches(&self, collection_id: Uuid) -> Result<Vec<BranchRow>, AppError> {
        Ok(sqlx::query_as::<_, BranchRow>(
            LIST_BRANCHES,
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_branch(
        &self,
        collection_id: Uuid,
        name: &str,
    ) -> Result<Option<BranchRow>, AppError> {
        Ok(sqlx::query_as::<_, BranchRow>(
            "SELECT * FROM branches WHERE collection_id = $1 AND name = $2",
        )
        .bind(collection_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_branch(&self, new: NewBranch) -> Result<BranchRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, BranchRow>(
            r#"
            INSERT INTO branches
                (id, collection_id, name, description, parent_branch, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.collection_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.parent_branch)
        .bind(&new.created_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Created branch '{}' in collection {}",
            row.name, row.collection_id
        );
        Ok(row)
    }

    async fn get_note(
        &self,
        folder_id: Uuid,
        branch_name: &str,
    ) -> Result<Option<NoteRow>, AppError> {
        Ok(sqlx::query_as::<_, NoteRow>(
            "SELECT * FROM notes WHERE folder_id = $1 AND branch_name = $2",
        )
        .bind(folder_id)
        .bind(branch_name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_note(&self, new: NewNote) -> Result<NoteRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO notes
                (id, folder_id, branch_name, title, content, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.folder_id)
        .bind(&new.branch_name)
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.author_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Created note {} for folder {} on branch '{}'",
            row.id, row.folder_id, row.branch_name
        );
        Ok(row)
    }

    async fn update_note(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<NoteRow>, AppError> {
        Ok(sqlx::query_as::<_, NoteRow>(
            r#"
            UPDATE notes
            SET title = $2, content = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn save_note(&self, new: NewNote) -> Result<NoteRow, AppError> {
        let now = Utc::now();
        Ok(sqlx::query_as::<_, NoteRow>(
            r#"
            INSERT INTO notes
                (id, folder_id, branch_name, title, content, author_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT ON CONSTRAINT notes_folder_branch_unique DO UPDATE
            SET title = EXCLUDED.title,
                content = EXCLUDED.content,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.folder_id)
        .bind(&new.branch_name)
        .bind(&new.title)
        .bind(&new.content)
        .bind(&new.author_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn search_notes(&self, search: &NoteSearch) -> Result<Vec<NoteRow>, AppError> {
        // strpos keeps the match literal; LIKE would treat % and _ as wildcards.
        Ok(sqlx::query_as::<_, NoteRow>(
            r#"
            SELECT n.*
            FROM notes n
            JOIN folders f ON f.id = n.folder_id
            JOIN boxes b ON b.id = f.box_id
            JOIN collections c ON c.id = b.collection_id
            WHERE (strpos(n.title, $1) > 0 OR strpos(n.content, $1) > 0)
              AND ($2::varchar IS NULL OR n.branch_name = $2)
              AND ($3::uuid IS NULL OR c.archive_id = $3)
            ORDER BY n.updated_at DESC
            "#,
        )
        .bind(&search.query)
        .bind(&search.branch_name)
        .bind(search.archive_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_pull_requests(&self, folder_id: Uuid) -> Result<Vec<PullRequestRow>, AppError> {
        Ok(sqlx::query_as::<_, PullRequestRow>(
            "SELECT * FROM pull_requests WHERE folder_id = $1 ORDER BY created_at DESC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_pull_request(&self, id: Uuid) -> Result<Option<PullRequestRow>, AppError> {
        Ok(
            sqlx::query_as::<_, PullRequestRow>("SELECT * FROM pull_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_pull_request(
        &self,
        new: NewPullRequest,
    ) -> Result<PullRequestRow, AppError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            INSERT INTO pull_requests
                (id, folder_id, source_branch, target_branch, title, description,
                 author_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.folder_id)
        .bind(&new.source_branch)
        .bind(&new.target_branch)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.author_id)
        .bind(PullRequestStatus::Open.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Opened pull request {} ({} -> {}) on folder {}",
            row.id, row.source_branch, row.target_branch, row.folder_id
        );
        Ok(row)
    }

    async fn transition_pull_request(
        &self,
        id: Uuid,
        from: PullRequestStatus,
        to: PullRequestStatus,
        reviewer_id: Option<&str>,
    ) -> Result<Option<PullRequestRow>, AppError> {
        Ok(sqlx::query_as::<_, PullRequestRow>(
            r#"
            UPDATE pull_requests
            SET status = $3,
                reviewer_id = COALESCE($4, reviewer_id),
                updated_at = $5
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(reviewer_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_listings_ignore_database_collation() {
        for sql in [
            LIST_ARCHIVES,
            LIST_COLLECTIONS,
            LIST_BOXES,
            LIST_FOLDERS,
            LIST_BRANCHES,
        ] {
            assert!(sql.ends_with(r#"ORDER BY name COLLATE "C""#), "{sql}");
        }
    }
}
