//! CLI input validation functions.
//!
//! Used by clap's `value_parser` attribute so bad input is rejected at parse
//! time with a specific message.

use crate::domain::{TaskId, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};
use chrono::NaiveDate;

/// Parse a task id (hyphenated UUID).
pub fn validate_task_id(s: &str) -> Result<TaskId, String> {
    TaskId::parse(s)
}

/// Validate a user or project name.
///
/// Delegates to `commands::init` so the rules live in one place.
pub fn validate_name(s: &str) -> Result<String, String> {
    use crate::commands::init;

    let trimmed = s.trim();
    init::validate_name("name", trimmed).map_err(|e| e.to_string())?;
    Ok(trimmed.to_string())
}

/// Validate a task title: 1-200 characters after trimming, single line.
pub fn validate_title(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    let len = s.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters, got {len} characters"
        ));
    }

    if s.contains('\n') || s.contains('\r') {
        return Err("Title cannot contain newline characters".to_string());
    }

    Ok(s.to_string())
}

/// Validate description length.
pub fn validate_description(s: &str) -> Result<String, String> {
    let len = s.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters, got {len} characters"
        ));
    }
    Ok(s.to_string())
}

/// Parse a due date in `YYYY-MM-DD` form.
pub fn validate_due_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{s}': expected YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn task_id_is_parsed_and_normalized() {
        let id = validate_task_id("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(id.as_str(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(validate_task_id("proj-abc").is_err());
    }

    #[rstest]
    #[case::ok("  Fix login  ", Ok("Fix login".to_string()))]
    #[case::empty("   ", Err("cannot be empty"))]
    #[case::newline("two\nlines", Err("newline"))]
    fn title_validation(#[case] input: &str, #[case] expected: Result<String, &str>) {
        match (validate_title(input), expected) {
            (Ok(got), Ok(want)) => assert_eq!(got, want),
            (Err(got), Err(want)) => assert!(got.contains(want), "got: {got}"),
            (got, want) => panic!("expected {want:?}, got {got:?}"),
        }
    }

    #[test]
    fn title_length_counts_characters() {
        let title = "é".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
        assert!(validate_title(&format!("{title}é")).is_err());
    }

    #[test]
    fn description_limit() {
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LENGTH)).is_ok());
        assert!(validate_description(&"x".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
    }

    #[rstest]
    #[case::valid("2025-03-01", true)]
    #[case::padded(" 2025-03-01 ", true)]
    #[case::bad_month("2025-13-01", false)]
    #[case::wrong_format("03/01/2025", false)]
    fn due_date_validation(#[case] input: &str, #[case] ok: bool) {
        assert_eq!(validate_due_date(input).is_ok(), ok);
    }

    #[test]
    fn name_validation_trims() {
        assert_eq!(validate_name(" work ").unwrap(), "work");
        assert!(validate_name("two words").is_err());
    }
}
