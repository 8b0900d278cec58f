//! Pull request tracker.
//!
//! A pull request records a proposal to treat `source_branch`'s note as
//! superseding `target_branch`'s note on one folder. Status changes are
//! record-only: merging stamps the decision and the reviewer but never touches
//! note content. Whether to propagate content is left to the caller.

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::PullRequestRow;
use crate::pull_requests::status::PullRequestStatus;
use crate::store::{NewPullRequest, ResearchStore};
use crate::validation::{branch_name, optional, required, MAX_NAME_LEN, MAX_TITLE_LEN};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    pub folder_id: Uuid,
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub reviewer_id: Option<String>,
}

pub async fn list_pull_requests(
    store: &dyn ResearchStore,
    folder_id: Uuid,
) -> Result<Vec<PullRequestRow>, AppError> {
    store.list_pull_requests(folder_id).await
}

pub async fn get_pull_request(
    store: &dyn ResearchStore,
    id: Uuid,
) -> Result<PullRequestRow, AppError> {
    store
        .get_pull_request(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Pull request {id} not found")))
}

/// Opens a pull request. Source and target may be equal and neither needs a
/// note on the folder.
pub async fn create_pull_request(
    store: &dyn ResearchStore,
    req: CreatePullRequestRequest,
    caller_id: &str,
) -> Result<PullRequestRow, AppError> {
    let new = NewPullRequest {
        folder_id: req.folder_id,
        source_branch: branch_name("sourceBranch", &req.source_branch)?,
        target_branch: branch_name("targetBranch", &req.target_branch)?,
        title: required("title", &req.title, MAX_TITLE_LEN)?,
        description: optional("description", req.description.as_deref(), None)?,
        author_id: required(
            "authorId",
            req.author_id.as_deref().unwrap_or(caller_id),
            MAX_NAME_LEN,
        )?,
    };
    store.create_pull_request(new).await
}

/// Moves an open pull request to `merged` or `closed`.
///
/// # Errors
/// - `Validation` for an unknown status string
/// - `NotFound` when `id` does not resolve
/// - `InvalidTransition` when the request is already terminal, or the target is `open`
pub async fn update_status(
    store: &dyn ResearchStore,
    id: Uuid,
    new_status: &str,
    reviewer_id: Option<&str>,
) -> Result<PullRequestRow, AppError> {
    let next: PullRequestStatus = new_status.parse().map_err(AppError::Validation)?;
    let reviewer_id = match reviewer_id {
        Some(raw) => Some(required("reviewerId", raw, MAX_NAME_LEN)?),
        None => None,
    };

    if !PullRequestStatus::Open.can_transition_to(next) {
        // Still distinguish an unknown id from an illegal target.
        let current = get_pull_request(store, id).await?;
        return Err(AppError::InvalidTransition(format!(
            "Pull request {id} cannot move from {} to {next}",
            current.status
        )));
    }

    match store
        .transition_pull_request(id, PullRequestStatus::Open, next, reviewer_id.as_deref())
        .await?
    {
        Some(updated) => {
            info!(
                "Pull request {id} {} by {}",
                updated.status,
                updated.reviewer_id.as_deref().unwrap_or("unknown reviewer")
            );
            Ok(updated)
        }
        None => {
            let current = get_pull_request(store, id).await?;
            Err(AppError::InvalidTransition(format!(
                "Pull request {id} is already {} and cannot move to {next}",
                current.status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::service::{create_note, get_note, CreateNoteRequest};
    use crate::test_support::{seeded_store, TEST_REVIEWER, TEST_USER};

    fn pr_req(folder_id: Uuid, source: &str, target: &str) -> CreatePullRequestRequest {
        CreatePullRequestRequest {
            folder_id,
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            title: format!("Merge {source} into {target}"),
            description: None,
            author_id: None,
        }
    }

    #[tokio::test]
    async fn test_new_pull_request_is_open() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        assert_eq!(pr.status, PullRequestStatus::Open);
        assert_eq!(pr.author_id, TEST_USER);
        assert!(pr.reviewer_id.is_none());
    }

    #[tokio::test]
    async fn test_same_source_and_target_is_allowed() {
        let (store, fx) = seeded_store().await;
        assert!(
            create_pull_request(&*store, pr_req(fx.folder.id, "main", "main"), TEST_USER)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_create_requires_title_and_branches() {
        let (store, fx) = seeded_store().await;
        let mut req = pr_req(fx.folder.id, "lens", "main");
        req.title = String::new();
        assert!(matches!(
            create_pull_request(&*store, req, TEST_USER).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_pull_request(&*store, pr_req(fx.folder.id, "", "main"), TEST_USER).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_in_unknown_folder_is_not_found() {
        let (store, _) = seeded_store().await;
        assert!(matches!(
            create_pull_request(&*store, pr_req(Uuid::new_v4(), "lens", "main"), TEST_USER).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_merge_is_record_only() {
        let (store, fx) = seeded_store().await;
        for (branch, content) in [("lens", "lens view"), ("main", "main view")] {
            create_note(
                &*store,
                CreateNoteRequest {
                    folder_id: fx.folder.id,
                    branch_name: branch.to_string(),
                    title: branch.to_string(),
                    content: content.to_string(),
                    author_id: None,
                },
                TEST_USER,
            )
            .await
            .unwrap();
        }
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();

        update_status(&*store, pr.id, "merged", Some(TEST_REVIEWER))
            .await
            .unwrap();

        let listed = list_pull_requests(&*store, fx.folder.id).await.unwrap();
        assert_eq!(listed[0].status, PullRequestStatus::Merged);
        assert_eq!(listed[0].reviewer_id.as_deref(), Some(TEST_REVIEWER));

        let source = get_note(&*store, fx.folder.id, "lens").await.unwrap();
        let target = get_note(&*store, fx.folder.id, "main").await.unwrap();
        assert_eq!(source.content, "lens view");
        assert_eq!(target.content, "main view");
    }

    #[tokio::test]
    async fn test_close_without_reviewer() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        let closed = update_status(&*store, pr.id, "closed", None).await.unwrap();
        assert_eq!(closed.status, PullRequestStatus::Closed);
        assert!(closed.reviewer_id.is_none());
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (store, _) = seeded_store().await;
        for status in ["merged", "open"] {
            let err = update_status(&*store, Uuid::new_v4(), status, Some(TEST_REVIEWER))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "status {status}");
        }
    }

    #[tokio::test]
    async fn test_terminal_states_reject_further_transitions() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        update_status(&*store, pr.id, "merged", Some(TEST_REVIEWER))
            .await
            .unwrap();

        for status in ["closed", "merged", "open"] {
            let err = update_status(&*store, pr.id, status, Some(TEST_USER))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidTransition(_)), "status {status}");
        }
        let pr = get_pull_request(&*store, pr.id).await.unwrap();
        assert_eq!(pr.status, PullRequestStatus::Merged);
        assert_eq!(pr.reviewer_id.as_deref(), Some(TEST_REVIEWER));
    }

    #[tokio::test]
    async fn test_reopen_is_invalid_transition() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        assert!(matches!(
            update_status(&*store, pr.id, "open", None).await,
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_status_is_validation_error() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        assert!(matches!(
            update_status(&*store, pr.id, "approved", None).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_reviewer_is_not_found() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        assert!(matches!(
            update_status(&*store, pr.id, "merged", Some("ghost")).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(
            get_pull_request(&*store, pr.id).await.unwrap().status,
            PullRequestStatus::Open
        );
    }

    #[tokio::test]
    async fn test_settled_request_with_unknown_reviewer_is_invalid_transition() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();
        update_status(&*store, pr.id, "merged", Some(TEST_REVIEWER))
            .await
            .unwrap();

        assert!(matches!(
            update_status(&*store, pr.id, "closed", Some("ghost")).await,
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped_to_folder() {
        let (store, fx) = seeded_store().await;
        let first = create_pull_request(&*store, pr_req(fx.folder.id, "a", "main"), TEST_USER)
            .await
            .unwrap();
        let second = create_pull_request(&*store, pr_req(fx.folder.id, "b", "main"), TEST_USER)
            .await
            .unwrap();
        create_pull_request(&*store, pr_req(fx.other_folder.id, "c", "main"), TEST_USER)
            .await
            .unwrap();

        let ids: Vec<Uuid> = list_pull_requests(&*store, fx.folder.id)
            .await
            .unwrap()
            .into_iter()
            .map(|pr| pr.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_racing_reviewers_only_one_wins() {
        let (store, fx) = seeded_store().await;
        let pr = create_pull_request(&*store, pr_req(fx.folder.id, "lens", "main"), TEST_USER)
            .await
            .unwrap();

        let pr_id = pr.id;
        let merge = {
            let store = store.clone();
            tokio::spawn(async move {
                update_status(&*store, pr_id, "merged", Some(TEST_REVIEWER)).await
            })
        };
        let close = {
            let store = store.clone();
            tokio::spawn(async move {
                update_status(&*store, pr_id, "closed", Some(TEST_USER)).await
            })
        };

        let outcomes = [merge.await.unwrap(), close.await.unwrap()];
        let wins = outcomes.iter().filter(|o| o.is_ok()).count();
        let rejected = outcomes
            .iter()
            .filter(|o| matches!(o, Err(AppError::InvalidTransition(_))))
            .count();
        assert_eq!((wins, rejected), (1, 1));
    }
}
