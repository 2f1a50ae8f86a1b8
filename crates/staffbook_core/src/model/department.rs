//! Department domain model.
//!
//! `phone` is the natural key: cascade writes use it to find an existing
//! department before creating a new one.

use crate::model::validation::{check_length, check_phone, ValidationError, MAX_NAME_CHARS};
use serde::{Deserialize, Serialize};

pub type DepartmentId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Option<DepartmentId>,
    pub name: Option<String>,
    /// Unique across departments.
    pub phone: Option<String>,
}

impl Department {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            phone: Some(phone.into()),
        }
    }

    /// Checks present fields against length and phone rules.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("department.name", self.name.as_deref(), MAX_NAME_CHARS)?;
        check_phone("department.phone", self.phone.as_deref())
    }
}
