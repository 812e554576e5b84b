//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::error::{AppError, ErrorCode};
use shared::models::AmountInput;

use crate::money::MAX_AMOUNT;

/// Member / guest / expense / period names
pub const MAX_NAME_LEN: usize = 200;

/// Game notes
pub const MAX_NOTE_LEN: usize = 500;

/// Avatar letters and color codes
pub const MAX_SHORT_TEXT_LEN: usize = 32;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")).with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Parse a money input that must be `>= 0`
pub fn parse_non_negative_amount(input: &AmountInput, field: &str) -> Result<f64, AppError> {
    let value = input.parse().ok_or_else(|| {
        AppError::validation(format!("{field} is not a valid amount")).with_detail("field", field)
    })?;
    if value < 0.0 {
        return Err(
            AppError::validation(format!("{field} must not be negative")).with_detail("field", field)
        );
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} exceeds the maximum amount"),
        )
        .with_detail("field", field));
    }
    Ok(value)
}

/// Trimmed optional text; blank becomes `None`
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Split a comma-separated name list, dropping blanks
pub fn split_names(names: &str) -> Vec<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove duplicate ids, keeping first occurrence order
pub fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Lan", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        let long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(validate_required_text(&long, "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "note", MAX_NOTE_LEN).is_ok());
        let long = Some("x".repeat(MAX_NOTE_LEN + 1));
        assert!(validate_optional_text(&long, "note", MAX_NOTE_LEN).is_err());
    }

    #[test]
    fn test_parse_non_negative_amount() {
        assert_eq!(
            parse_non_negative_amount(&AmountInput::Text("120,000".into()), "amount").unwrap(),
            120_000.0
        );
        assert_eq!(
            parse_non_negative_amount(&AmountInput::Number(0.0), "amount").unwrap(),
            0.0
        );
        assert!(parse_non_negative_amount(&AmountInput::Number(-1.0), "amount").is_err());
        assert!(parse_non_negative_amount(&AmountInput::Text("n/a".into()), "amount").is_err());
    }

    #[test]
    fn test_amount_above_maximum_is_out_of_range() {
        let err = parse_non_negative_amount(&AmountInput::Number(MAX_AMOUNT * 2.0), "expenses[0].amount")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert_eq!(err.details.unwrap()["field"], "expenses[0].amount");
    }

    #[test]
    fn test_split_names() {
        assert_eq!(
            split_names(" An, Binh ,, Chi,"),
            vec!["An".to_string(), "Binh".to_string(), "Chi".to_string()]
        );
        assert!(split_names(" , ").is_empty());
    }

    #[test]
    fn test_dedup_ids_keeps_order() {
        assert_eq!(dedup_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  ".into())), None);
        assert_eq!(non_blank(&Some(" Q1 ".into())), Some("Q1".into()));
    }
}
