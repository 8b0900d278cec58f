//! Demo dataset: one archive down to two folders, two interpretive branches
//! and a pair of notes that differ by branch on the same folder.

use tracing::{error, info};

use crate::errors::AppError;
use crate::models::user::UpsertUser;
use crate::store::{
    NewArchive, NewBox, NewBranch, NewCollection, NewFolder, NewNote, ResearchStore,
};

const OVERVIEW_NOTE: &str = "# Clinical Trial Data

This folder contains comprehensive clinical study data from the Fallope Ring contraceptive device trials conducted between 1965-1970.

## Key Findings
- Trial included 2,000 participants across 5 clinical sites
- Efficacy rate of 97.2% over 2-year study period
- Minimal side effects reported in less than 3% of participants

## Documentation Includes
- Individual patient charts
- Statistical analysis reports
- Regulatory submission documents

*Note: All patient data has been de-identified in accordance with privacy regulations.*";

const AGENCY_NOTE: &str = "# Reframing the Clinical Data: Women's Autonomy

Reviewing these clinical trials through a feminist health lens reveals important insights about women's reproductive autonomy in the 1960s.

## Participant Agency
While the original documentation focuses on medical efficacy, examining the informed consent processes and participant feedback reveals:

- Women actively sought long-term contraceptive options
- Participants expressed desire for methods they could control
- Many reported relief at having a reversible, non-hormonal option

## Historical Context
This research occurred during a critical period when:
- Birth control access was still restricted in many states
- Women had limited contraceptive choices
- The women's liberation movement was gaining momentum

## Research Questions for Further Investigation
- How did participants learn about the trial?
- What were their motivations for participating?
- How did socioeconomic factors influence access to the trial?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    /// At least one archive already existed; nothing was written.
    Skipped,
}

/// Writes the demo dataset unless the store already holds an archive.
pub async fn seed_demo_data(
    store: &dyn ResearchStore,
    user: UpsertUser,
) -> Result<SeedOutcome, AppError> {
    if !store.list_archives().await?.is_empty() {
        return Ok(SeedOutcome::Skipped);
    }

    let author = store.upsert_user(user).await?.id;

    let archive = store
        .create_archive(NewArchive {
            name: "National Museum of American History".to_string(),
            institution: "Smithsonian Institution".to_string(),
            description: Some(
                "The National Museum of American History collects, preserves, and displays the heritage of the United States."
                    .to_string(),
            ),
        })
        .await?;

    let collection = store
        .create_collection(NewCollection {
            archive_id: archive.id,
            name: "InBae Yoon Papers".to_string(),
            description: Some(
                "Personal and professional papers of Dr. InBae Yoon, inventor of the contraceptive device known as the Fallope Ring."
                    .to_string(),
            ),
        })
        .await?;

    let box_row = store
        .create_box(NewBox {
            collection_id: collection.id,
            name: "Box 1: Personal Correspondence and Clinical Studies".to_string(),
            description: Some(
                "Contains personal letters and early clinical trial documentation.".to_string(),
            ),
        })
        .await?;

    let trial_folder = store
        .create_folder(NewFolder {
            box_id: box_row.id,
            name: "Folder 1: Clinical Trial Data".to_string(),
            description: Some(
                "Original clinical study data and patient records from Fallope Ring trials."
                    .to_string(),
            ),
        })
        .await?;

    store
        .create_folder(NewFolder {
            box_id: box_row.id,
            name: "Folder 2: Patent Documents".to_string(),
            description: Some("Patent applications and related legal documentation.".to_string()),
        })
        .await?;

    let branches = [
        (
            "feminist-health-perspectives",
            "Interpreting the collection through the lens of women's health and reproductive rights.",
        ),
        (
            "business-medicine",
            "Focus on the commercial and medical innovation aspects of the contraceptive development.",
        ),
    ];
    for (name, description) in branches {
        store
            .create_branch(NewBranch {
                collection_id: collection.id,
                name: name.to_string(),
                description: Some(description.to_string()),
                parent_branch: Some("main".to_string()),
                created_by: author.clone(),
            })
            .await?;
    }

    let notes = [
        ("main", "Clinical Trial Overview", OVERVIEW_NOTE),
        (
            "feminist-health-perspectives",
            "Women's Agency in Contraceptive Research",
            AGENCY_NOTE,
        ),
    ];
    for (branch, title, content) in notes {
        store
            .create_note(NewNote {
                folder_id: trial_folder.id,
                branch_name: branch.to_string(),
                title: title.to_string(),
                content: content.to_string(),
                author_id: author.clone(),
            })
            .await?;
    }

    Ok(SeedOutcome::Seeded)
}

/// Seeds and logs the outcome. Failures never propagate.
pub async fn run_seed(store: &dyn ResearchStore, user: UpsertUser) {
    match seed_demo_data(store, user).await {
        Ok(SeedOutcome::Seeded) => info!("Demo data seeded"),
        Ok(SeedOutcome::Skipped) => info!("Archives already present, skipping demo data"),
        Err(e) => error!("Failed to seed demo data: {e}"),
    }
}
