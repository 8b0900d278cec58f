//! Field checks shared by the create/update operations.
//!
//! Limits follow the column widths in `migrations/`.

use crate::errors::AppError;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_BRANCH_LEN: usize = 100;

/// Trims `value` and requires it to be non-empty and at most `max_len` characters.
pub fn required(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text collapses to `None`.
pub fn optional(
    field: &str,
    value: Option<&str>,
    max_len: Option<usize>,
) -> Result<Option<String>, AppError> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Some(max_len) = max_len {
        if trimmed.chars().count() > max_len {
            return Err(AppError::Validation(format!(
                "{field} must be at most {max_len} characters"
            )));
        }
    }
    Ok(Some(trimmed.to_string()))
}

/// Branch names are labels used in URLs, so they must not contain `/` or
/// control characters. Case is preserved.
pub fn branch_name(field: &str, value: &str) -> Result<String, AppError> {
    let name = required(field, value, MAX_BRANCH_LEN)?;
    if name.contains('/') || name.chars().any(char::is_control) {
        return Err(AppError::Validation(format!(
            "{field} must not contain '/' or control characters"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Box 1 ", MAX_NAME_LEN).unwrap(), "Box 1");
    }

    #[test]
    fn test_required_rejects_blank() {
        let err = required("name", "   ", MAX_NAME_LEN).unwrap_err();
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn test_required_counts_chars_not_bytes() {
        let title = "é".repeat(MAX_TITLE_LEN);
        assert!(required("title", &title, MAX_TITLE_LEN).is_ok());
        assert!(required("title", &format!("{title}é"), MAX_TITLE_LEN).is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional("description", Some("  "), None).unwrap(), None);
        assert_eq!(optional("description", None, None).unwrap(), None);
        assert_eq!(
            optional("description", Some(" notes "), None).unwrap().as_deref(),
            Some("notes")
        );
    }

    #[test]
    fn test_optional_enforces_limit() {
        let long = "x".repeat(MAX_BRANCH_LEN + 1);
        assert!(optional("parentBranch", Some(&long), Some(MAX_BRANCH_LEN)).is_err());
    }

    #[test]
    fn test_branch_name_keeps_case() {
        assert_eq!(branch_name("name", "Business-Medicine").unwrap(), "Business-Medicine");
    }

    #[test]
    fn test_branch_name_rejects_slash() {
        assert!(branch_name("name", "feature/one").is_err());
    }
}
