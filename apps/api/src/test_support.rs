//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::models::hierarchy::{ArchiveRow, BoxRow, CollectionRow, FolderRow};
use crate::models::user::UpsertUser;
use crate::store::{MemoryStore, NewArchive, NewBox, NewCollection, NewFolder, ResearchStore};

pub const TEST_USER: &str = "mock-user-1";
pub const TEST_REVIEWER: &str = "reviewer-1";

pub struct Fixture {
    pub archive: ArchiveRow,
    pub collection: CollectionRow,
    pub box_row: BoxRow,
    pub folder: FolderRow,
    pub other_folder: FolderRow,
}

fn user(id: &str) -> UpsertUser {
    UpsertUser {
        id: id.to_string(),
        email: Some(format!("{id}@university.edu")),
        first_name: None,
        last_name: None,
        profile_image_url: None,
    }
}

/// A memory store holding two users and one archive → collection → box
/// chain with two folders.
pub async fn seeded_store() -> (Arc<MemoryStore>, Fixture) {
    let store = Arc::new(MemoryStore::new());
    store.upsert_user(user(TEST_USER)).await.unwrap();
    store.upsert_user(user(TEST_REVIEWER)).await.unwrap();

    let archive = store
        .create_archive(NewArchive {
            name: "National Museum of American History".to_string(),
            institution: "Smithsonian Institution".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let collection = store
        .create_collection(NewCollection {
            archive_id: archive.id,
            name: "InBae Yoon Papers".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let box_row = store
        .create_box(NewBox {
            collection_id: collection.id,
            name: "Box 1".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let folder = store
        .create_folder(NewFolder {
            box_id: box_row.id,
            name: "Folder 1: Clinical Trial Data".to_string(),
            description: None,
        })
        .await
        .unwrap();
    let other_folder = store
        .create_folder(NewFolder {
            box_id: box_row.id,
            name: "Folder 2: Patent Documents".to_string(),
            description: None,
        })
        .await
        .unwrap();

    (
        store,
        Fixture {
            archive,
            collection,
            box_row,
            folder,
            other_folder,
        },
    )
}
