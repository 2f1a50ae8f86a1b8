//! Construction-time validation shared by all staff records.
//!
//! # Responsibility
//! - Define the single `ValidationError` kind raised before any storage call.
//! - Provide field checks reused by entity `validate()` methods.
//!
//! # Invariants
//! - Validation never touches the database.
//! - Absent (`None`) fields are always valid; only present values are checked.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Maximum characters for free-text name fields.
pub const MAX_NAME_CHARS: usize = 255;
/// Maximum characters for phone fields.
pub const MAX_PHONE_CHARS: usize = 20;
/// Maximum digits of a canonical passport number.
pub const MAX_PASSPORT_NUMBER_DIGITS: usize = 10;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9(][0-9 ()\-]*[0-9]$").expect("valid phone regex"));

/// Malformed input detected while building or checking a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("passport type must be either National or International, got `{0}`")]
    InvalidPassportType(String),
    #[error("passport number must be numeric, got `{0}`")]
    NonNumericPassportNumber(String),
    #[error("passport number must be at most {max} digits, got {actual}")]
    PassportNumberTooLong { max: usize, actual: usize },
    #[error("{field} is not a valid phone number: `{value}`")]
    InvalidPhone { field: &'static str, value: String },
    #[error("{field} must be at most {max} characters, got {actual}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("{0} is required")]
    MissingField(&'static str),
    /// An explicit foreign key points at a row that does not exist.
    #[error("{entity} {id} does not exist")]
    UnknownReference { entity: &'static str, id: i64 },
}

pub(crate) fn check_length(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

pub(crate) fn check_phone(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    check_length(field, Some(value), MAX_PHONE_CHARS)?;
    if value.chars().count() < 3 || !PHONE_RE.is_match(value) {
        return Err(ValidationError::InvalidPhone {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
