use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::Row;

/// Minimum accepted phone length, in characters.
pub const PHONE_MIN_LENGTH: usize = 10;

static EMAIL_SHAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Returns whether the value looks like `local@domain.tld`.
///
/// Shape check only; deliverability is not verified.
#[must_use]
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_SHAPE
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

/// Returns whether the phone value meets the minimum length.
#[must_use]
pub fn is_phone_long_enough(value: &str) -> bool {
    value.chars().count() >= PHONE_MIN_LENGTH
}

/// Record kinds accepted by bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportEntityKind {
    /// Sales leads.
    Lead,
}

impl ImportEntityKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
        }
    }
}

/// Verdict for one import attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether no problems were found.
    pub valid: bool,
    /// Problems in row order; each names a 1-based row and a field.
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Builds a result from collected errors.
    #[must_use]
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Screens decoded rows before they are accepted.
///
/// Every row is checked and every problem is reported; validation never stops
/// at the first error.
#[must_use]
pub fn validate_import(kind: ImportEntityKind, rows: &[Row<String>]) -> ValidationResult {
    let mut errors = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        match kind {
            ImportEntityKind::Lead => validate_lead_row(row_number, row, &mut errors),
        }
    }

    ValidationResult::from_errors(errors)
}

fn validate_lead_row(row_number: usize, row: &Row<String>, errors: &mut Vec<String>) {
    if present(row, "name").is_none() {
        errors.push(format!("row {row_number}: field 'name' is required"));
    }

    if let Some(email) = present(row, "email") {
        if !is_email_shaped(email) {
            errors.push(format!(
                "row {row_number}: field 'email' has invalid format '{email}'"
            ));
        }
    }

    if let Some(phone) = present(row, "phone") {
        if !is_phone_long_enough(phone) {
            errors.push(format!(
                "row {row_number}: field 'phone' must be at least {PHONE_MIN_LENGTH} characters"
            ));
        }
    }
}

fn present<'a>(row: &'a Row<String>, column: &str) -> Option<&'a str> {
    row.get(column)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::Row;

    use super::{ImportEntityKind, ValidationResult, is_email_shaped, validate_import};

    fn row(pairs: &[(&str, &str)]) -> Row<String> {
        pairs
            .iter()
            .map(|(column, value)| (*column, (*value).to_owned()))
            .collect()
    }

    #[test]
    fn collects_every_error_with_row_numbers() {
        let rows = vec![
            row(&[("name", ""), ("email", "bad")]),
            row(&[("name", "Ann"), ("phone", "123")]),
        ];

        let result = validate_import(ImportEntityKind::Lead, &rows);

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "row 1: field 'name' is required".to_owned(),
                "row 1: field 'email' has invalid format 'bad'".to_owned(),
                "row 2: field 'phone' must be at least 10 characters".to_owned(),
            ]
        );
    }

    #[test]
    fn missing_name_column_counts_as_missing() {
        let result = validate_import(ImportEntityKind::Lead, &[row(&[("email", "a@b.co")])]);

        assert_eq!(result.errors, vec!["row 1: field 'name' is required".to_owned()]);
    }

    #[test]
    fn optional_fields_are_skipped_when_blank() {
        let rows = vec![row(&[("name", "Ann"), ("email", ""), ("phone", "  ")])];

        let result = validate_import(ImportEntityKind::Lead, &rows);
        assert_eq!(result, ValidationResult::from_errors(Vec::new()));
        assert!(result.valid);
    }

    #[test]
    fn well_formed_rows_are_valid() {
        let rows = vec![
            row(&[
                ("name", "Ann"),
                ("email", "ann@example.com"),
                ("phone", "+1 555 0100"),
            ]),
            row(&[("name", "Bo")]),
        ];

        assert!(validate_import(ImportEntityKind::Lead, &rows).valid);
    }

    #[test]
    fn no_rows_is_valid() {
        assert!(validate_import(ImportEntityKind::Lead, &[]).valid);
    }

    #[test]
    fn email_shape_is_shallow() {
        assert!(is_email_shaped("a@b.c"));
        assert!(is_email_shaped("first.last+tag@sub.example.org"));
        assert!(!is_email_shaped("ann@example"));
        assert!(!is_email_shaped("ann example@x.io"));
        assert!(!is_email_shaped("@example.com"));
    }
}
