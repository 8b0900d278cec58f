//! Substring search over note titles and content.
//!
//! Matching is case-sensitive, mirroring `strpos` in the Postgres store.
//! Empty filter values from the client mean "no filter".

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::annotation::NoteRow;
use crate::validation;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteSearch {
    pub query: String,
    /// Restricts results to folders under this archive.
    pub archive_id: Option<Uuid>,
    pub branch_name: Option<String>,
}

impl NoteSearch {
    pub fn new(
        query: Option<&str>,
        archive_id: Option<&str>,
        branch_name: Option<&str>,
    ) -> Result<Self, AppError> {
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::Validation("Query parameter is required".to_string()))?;

        let archive_id = match archive_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
                AppError::Validation(format!("archiveId '{raw}' is not a valid id"))
            })?),
            None => None,
        };

        let branch_name = match branch_name.filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(validation::branch_name("branchName", raw)?),
            None => None,
        };

        Ok(Self {
            query: query.to_string(),
            archive_id,
            branch_name,
        })
    }

    pub fn matches_text(&self, note: &NoteRow) -> bool {
        note.title.contains(&self.query) || note.content.contains(&self.query)
    }

    pub fn matches_branch(&self, note: &NoteRow) -> bool {
        self.branch_name
            .as_deref()
            .map_or(true, |branch| note.branch_name == branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn note(title: &str, content: &str, branch: &str) -> NoteRow {
        NoteRow {
            id: Uuid::new_v4(),
            folder_id: Uuid::new_v4(),
            branch_name: branch.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            author_id: "mock-user-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_query_is_rejected() {
        assert!(matches!(
            NoteSearch::new(None, None, None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            NoteSearch::new(Some(""), None, None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let search = NoteSearch::new(Some("trial"), Some(""), Some("  ")).unwrap();
        assert_eq!(search.archive_id, None);
        assert_eq!(search.branch_name, None);
    }

    #[test]
    fn test_bad_archive_id_is_rejected() {
        assert!(matches!(
            NoteSearch::new(Some("trial"), Some("not-a-uuid"), None),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_matches_title_or_content() {
        let search = NoteSearch::new(Some("Trial"), None, None).unwrap();
        assert!(search.matches_text(&note("Clinical Trial Overview", "", "main")));
        assert!(search.matches_text(&note("Overview", "# Trial data", "main")));
        assert!(!search.matches_text(&note("Overview", "Patents", "main")));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let search = NoteSearch::new(Some("trial"), None, None).unwrap();
        assert!(!search.matches_text(&note("Clinical Trial Overview", "", "main")));
    }

    #[test]
    fn test_query_is_literal_not_a_pattern() {
        let search = NoteSearch::new(Some("97%"), None, None).unwrap();
        assert!(search.matches_text(&note("", "Efficacy rate of 97% over", "main")));
        assert!(!search.matches_text(&note("", "Efficacy rate of 97.2", "main")));
    }

    #[test]
    fn test_branch_filter() {
        let search = NoteSearch::new(Some("x"), None, Some("business-medicine")).unwrap();
        assert!(search.matches_branch(&note("x", "", "business-medicine")));
        assert!(!search.matches_branch(&note("x", "", "main")));
    }

    #[test]
    fn test_branch_filter_is_normalised_like_stored_names() {
        let search = NoteSearch::new(Some("x"), None, Some(" lens ")).unwrap();
        assert_eq!(search.branch_name.as_deref(), Some("lens"));
        assert!(matches!(
            NoteSearch::new(Some("x"), None, Some("a/b")),
            Err(AppError::Validation(_))
        ));
    }
}
