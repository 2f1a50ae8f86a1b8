//! Passport domain model.
//!
//! # Responsibility
//! - Define the passport record owned by one employee.
//! - Own the construction-time rules for passport type and number.
//!
//! # Invariants
//! - A `PassportType` value is always `National` or `International`.
//! - A `PassportNumber` is always a canonical digit string of at most
//!   `MAX_PASSPORT_NUMBER_DIGITS` digits.
//! - Both rules also apply when values are deserialized.

use crate::model::employee::EmployeeId;
use crate::model::validation::{ValidationError, MAX_PASSPORT_NUMBER_DIGITS};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub type PassportId = i64;

/// Passport category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PassportType {
    National,
    International,
}

impl PassportType {
    /// Parses the exact stored/wire spelling.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "National" => Ok(Self::National),
            "International" => Ok(Self::International),
            other => Err(ValidationError::InvalidPassportType(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::National => "National",
            Self::International => "International",
        }
    }
}

impl Display for PassportType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PassportType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PassportType> for String {
    fn from(value: PassportType) -> Self {
        value.as_str().to_string()
    }
}

/// Canonical numeric passport number.
///
/// Input is parsed as an unsigned integer and re-rendered, so `"0012345"`
/// is stored as `"12345"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PassportNumber(String);

impl PassportNumber {
    /// Parses and canonicalizes a passport number.
    ///
    /// # Errors
    /// - `NonNumericPassportNumber` when the trimmed input is empty or holds
    ///   anything other than ASCII digits.
    /// - `PassportNumberTooLong` when the canonical form exceeds the limit.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(ValidationError::NonNumericPassportNumber(value.to_string()));
        }

        let significant = trimmed.trim_start_matches('0');
        let canonical = if significant.is_empty() {
            "0"
        } else {
            significant
        };
        if canonical.len() > MAX_PASSPORT_NUMBER_DIGITS {
            return Err(ValidationError::PassportNumberTooLong {
                max: MAX_PASSPORT_NUMBER_DIGITS,
                actual: canonical.len(),
            });
        }

        Ok(Self(canonical.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PassportNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PassportNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PassportNumber> for String {
    fn from(value: PassportNumber) -> Self {
        value.0
    }
}

/// Passport record.
///
/// All fields are optional so the same shape carries create input, partial
/// updates (`None` means "leave unchanged") and read results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    pub id: Option<PassportId>,
    /// Owning employee. Assigned by the store on create.
    pub employee_id: Option<EmployeeId>,
    /// Serialized as `type` to match the storage column.
    #[serde(rename = "type")]
    pub kind: Option<PassportType>,
    pub number: Option<PassportNumber>,
}

impl Passport {
    pub fn new(kind: PassportType, number: PassportNumber) -> Self {
        Self {
            id: None,
            employee_id: None,
            kind: Some(kind),
            number: Some(number),
        }
    }

    /// Builds a passport from raw text input, validating both fields.
    pub fn parse(kind: &str, number: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(PassportType::parse(kind)?, PassportNumber::parse(number)?))
    }
}
