//! Company domain model.

use crate::model::validation::{check_length, ValidationError, MAX_NAME_CHARS};
use serde::{Deserialize, Serialize};

pub type CompanyId = i64;

/// Company record. `name` doubles as the lookup key for cascade writes even
/// though storage does not declare it unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: Option<CompanyId>,
    pub name: Option<String>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("company.name", self.name.as_deref(), MAX_NAME_CHARS)
    }
}
