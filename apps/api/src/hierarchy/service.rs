//! Archive → collection → box → folder operations.
//!
//! Read-mostly. Listing an unknown parent yields an empty list; creating a
//! child under an unknown parent fails with `NotFound`.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::hierarchy::{ArchiveRow, BoxRow, CollectionRow, FolderRow};
use crate::store::{NewArchive, NewBox, NewCollection, NewFolder, ResearchStore};
use crate::validation::{optional, required, MAX_NAME_LEN};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArchiveRequest {
    pub name: String,
    pub institution: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionRequest {
    pub archive_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoxRequest {
    pub collection_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub box_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

pub async fn list_archives(store: &dyn ResearchStore) -> Result<Vec<ArchiveRow>, AppError> {
    store.list_archives().await
}

pub async fn get_archive(store: &dyn ResearchStore, id: Uuid) -> Result<ArchiveRow, AppError> {
    store
        .get_archive(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Archive {id} not found")))
}

pub async fn create_archive(
    store: &dyn ResearchStore,
    req: CreateArchiveRequest,
) -> Result<ArchiveRow, AppError> {
    let new = NewArchive {
        name: required("name", &req.name, MAX_NAME_LEN)?,
        institution: required("institution", &req.institution, MAX_NAME_LEN)?,
        description: optional("description", req.description.as_deref(), None)?,
    };
    store.create_archive(new).await
}

pub async fn list_collections(
    store: &dyn ResearchStore,
    archive_id: Uuid,
) -> Result<Vec<CollectionRow>, AppError> {
    store.list_collections(archive_id).await
}

pub async fn get_collection(
    store: &dyn ResearchStore,
    id: Uuid,
) -> Result<CollectionRow, AppError> {
    store
        .get_collection(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Collection {id} not found")))
}

pub async fn create_collection(
    store: &dyn ResearchStore,
    req: CreateCollectionRequest,
) -> Result<CollectionRow, AppError> {
    let new = NewCollection {
        archive_id: req.archive_id,
        name: required("name", &req.name, MAX_NAME_LEN)?,
        description: optional("description", req.description.as_deref(), None)?,
    };
    store.create_collection(new).await
}

pub async fn list_boxes(
    store: &dyn ResearchStore,
    collection_id: Uuid,
) -> Result<Vec<BoxRow>, AppError> {
    store.list_boxes(collection_id).await
}

pub async fn create_box(
    store: &dyn ResearchStore,
    req: CreateBoxRequest,
) -> Result<BoxRow, AppError> {
    let new = NewBox {
        collection_id: req.collection_id,
        name: required("name", &req.name, MAX_NAME_LEN)?,
        description: optional("description", req.description.as_deref(), None)?,
    };
    store.create_box(new).await
}

pub async fn list_folders(
    store: &dyn ResearchStore,
    box_id: Uuid,
) -> Result<Vec<FolderRow>, AppError> {
    store.list_folders(box_id).await
}

pub async fn get_folder(store: &dyn ResearchStore, id: Uuid) -> Result<FolderRow, AppError> {
    store
        .get_folder(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Folder {id} not found")))
}

pub async fn create_folder(
    store: &dyn ResearchStore,
    req: CreateFolderRequest,
) -> Result<FolderRow, AppError> {
    let new = NewFolder {
        box_id: req.box_id,
        name: required("name", &req.name, MAX_NAME_LEN)?,
        description: optional("description", req.description.as_deref(), None)?,
    };
    store.create_folder(new).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn archive_req(name: &str) -> CreateArchiveRequest {
        CreateArchiveRequest {
            name: name.to_string(),
            institution: "Smithsonian Institution".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_archives_are_listed_by_name() {
        let store = MemoryStore::new();
        create_archive(&store, archive_req("Zeta Library")).await.unwrap();
        create_archive(&store, archive_req("Alpha Museum")).await.unwrap();

        let names: Vec<String> = list_archives(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Alpha Museum", "Zeta Library"]);
    }

    #[tokio::test]
    async fn test_create_archive_requires_institution() {
        let store = MemoryStore::new();
        let mut req = archive_req("Museum");
        req.institution = "  ".to_string();
        assert!(matches!(
            create_archive(&store, req).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_unknown_archive_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            get_archive(&store, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_full_containment_chain() {
        let store = MemoryStore::new();
        let archive = create_archive(&store, archive_req("Museum")).await.unwrap();
        let collection = create_collection(
            &store,
            CreateCollectionRequest {
                archive_id: archive.id,
                name: "InBae Yoon Papers".to_string(),
                description: Some("Personal papers".to_string()),
            },
        )
        .await
        .unwrap();
        let box_row = create_box(
            &store,
            CreateBoxRequest {
                collection_id: collection.id,
                name: "Box 1".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        for name in ["Folder 2: Patents", "Folder 1: Clinical Trial Data"] {
            create_folder(
                &store,
                CreateFolderRequest {
                    box_id: box_row.id,
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        }

        assert_eq!(list_collections(&store, archive.id).await.unwrap().len(), 1);
        assert_eq!(list_boxes(&store, collection.id).await.unwrap().len(), 1);
        let folders = list_folders(&store, box_row.id).await.unwrap();
        assert_eq!(folders[0].name, "Folder 1: Clinical Trial Data");
        assert_eq!(
            get_folder(&store, folders[1].id).await.unwrap().name,
            "Folder 2: Patents"
        );
    }

    #[tokio::test]
    async fn test_child_of_unknown_parent_is_not_found() {
        let store = MemoryStore::new();
        let err = create_collection(
            &store,
            CreateCollectionRequest {
                archive_id: Uuid::new_v4(),
                name: "Orphan".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = create_folder(
            &store,
            CreateFolderRequest {
                box_id: Uuid::new_v4(),
                name: "Orphan".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listing_unknown_parent_is_empty() {
        let store = MemoryStore::new();
        assert!(list_boxes(&store, Uuid::new_v4()).await.unwrap().is_empty());
    }
}
