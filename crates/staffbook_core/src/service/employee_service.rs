//! Employee use-case service.
//!
//! # Responsibility
//! - Provide the employee read/write use cases to request adapters.
//! - Acquire one connection per call from a `ConnectionProvider`.
//! - Turn empty reads into `NotFound` and classify every other failure.
//!
//! # Invariants
//! - Connections are never shared across calls.
//! - `Fatal` is the only kind that may carry storage internals; adapters must
//!   not show its message to clients.

use crate::db::{ConnectionProvider, DbError};
use crate::model::company::CompanyId;
use crate::model::department::DepartmentId;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::validation::ValidationError;
use crate::repo::employee_repo::{DeleteOutcome, EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::error::{RepoError, RepoResult};
use log::info;
use thiserror::Error;

/// Caller-facing error kinds.
#[derive(Debug, Error)]
pub enum EmployeeServiceError {
    #[error(transparent)]
    Validation(ValidationError),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("storage failure: {0}")]
    Fatal(#[source] RepoError),
}

impl From<RepoError> for EmployeeServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Conflict(message) => Self::Conflict(message),
            other => Self::Fatal(other),
        }
    }
}

impl From<DbError> for EmployeeServiceError {
    fn from(value: DbError) -> Self {
        Self::Fatal(RepoError::Db(value))
    }
}

impl From<ValidationError> for EmployeeServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type ServiceResult<T> = Result<T, EmployeeServiceError>;

/// Employee service over a connection provider.
pub struct EmployeeService<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> EmployeeService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Lists employees of one company.
    ///
    /// # Errors
    /// - `NotFound` when the company has no employees.
    pub fn get_employees_by_company_id(&self, company_id: CompanyId) -> ServiceResult<Vec<Employee>> {
        let employees = self.with_repository(|repo| repo.get_employees_by_company_id(company_id))?;
        non_empty(employees, || {
            format!("no employees have been added for company {company_id} yet")
        })
    }

    /// Lists employees of one department.
    ///
    /// # Errors
    /// - `NotFound` when the department has no employees.
    pub fn get_employees_by_department_id(
        &self,
        department_id: DepartmentId,
    ) -> ServiceResult<Vec<Employee>> {
        let employees =
            self.with_repository(|repo| repo.get_employees_by_department_id(department_id))?;
        non_empty(employees, || {
            format!("no employees have been added for department {department_id} yet")
        })
    }

    /// Cascade-creates an employee and returns its new id.
    pub fn create_new_employee(&self, employee: &Employee) -> ServiceResult<EmployeeId> {
        self.with_repository(|repo| repo.add_employee(employee))
    }

    /// Applies a partial update to the employee identified by `employee.id`.
    pub fn update_employee(&self, employee: &Employee) -> ServiceResult<()> {
        let id = employee
            .id
            .ok_or(ValidationError::MissingField("employee.id"))?;
        self.with_repository(|repo| repo.update_employee_by_id(id, employee))
    }

    /// Deletes an employee and its passports. Unknown ids succeed.
    pub fn delete_employee(&self, id: EmployeeId) -> ServiceResult<DeleteOutcome> {
        self.with_repository(|repo| repo.delete_employee(id))
    }

    fn with_repository<T>(
        &self,
        work: impl FnOnce(&mut SqliteEmployeeRepository<'_>) -> RepoResult<T>,
    ) -> ServiceResult<T> {
        let mut conn = self.provider.connect()?;
        let mut repo = SqliteEmployeeRepository::try_new(&mut conn)?;
        Ok(work(&mut repo)?)
    }
}

fn non_empty(employees: Vec<Employee>, message: impl FnOnce() -> String) -> ServiceResult<Vec<Employee>> {
    if employees.is_empty() {
        let message = message();
        info!("event=employee_read module=service status=not_found message=\"{message}\"");
        return Err(EmployeeServiceError::NotFound(message));
    }
    Ok(employees)
}
