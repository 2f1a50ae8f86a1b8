//! Employee domain model.
//!
//! # Responsibility
//! - Define the root record of the staff object graph.
//! - Carry optional inline department/company/passports for cascade writes.
//!
//! # Invariants
//! - Read results are acyclic: an employee owns its passports, while
//!   department and company are flat references without back-links.
//! - Every optional field means "absent" on input; updates only touch
//!   fields that are present.

use crate::model::company::{Company, CompanyId};
use crate::model::department::{Department, DepartmentId};
use crate::model::passport::Passport;
use crate::model::validation::{check_length, check_phone, ValidationError, MAX_NAME_CHARS};
use serde::{Deserialize, Serialize};

pub type EmployeeId = i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EmployeeId>,
    pub name: Option<String>,
    pub surname: Option<String>,
    /// Unique across employees.
    pub phone: Option<String>,
    /// Explicit reference used when no inline `company` is supplied.
    /// Input only; reads carry the id inside `company`.
    #[serde(skip_serializing)]
    pub company_id: Option<CompanyId>,
    pub company: Option<Company>,
    /// Explicit reference used when no inline `department` is supplied.
    #[serde(skip_serializing)]
    pub department_id: Option<DepartmentId>,
    pub department: Option<Department>,
    pub passports: Option<Vec<Passport>>,
}

impl Employee {
    /// Creates an employee with personal fields set and no relations.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            surname: Some(surname.into()),
            phone: Some(phone.into()),
            ..Self::default()
        }
    }

    /// Validates present employee fields and any inline department/company.
    ///
    /// Passport fields are validated by construction (`PassportType`,
    /// `PassportNumber`), so they are not re-checked here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_length("employee.name", self.name.as_deref(), MAX_NAME_CHARS)?;
        check_length("employee.surname", self.surname.as_deref(), MAX_NAME_CHARS)?;
        check_phone("employee.phone", self.phone.as_deref())?;
        if let Some(department) = &self.department {
            department.validate()?;
        }
        if let Some(company) = &self.company {
            company.validate()?;
        }
        Ok(())
    }

    /// Passports attached to this record, empty when none were supplied.
    pub fn passports(&self) -> &[Passport] {
        self.passports.as_deref().unwrap_or_default()
    }
}
