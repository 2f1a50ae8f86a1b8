//! Request-layer adapter over the employee service.
//!
//! # Responsibility
//! - Expose the employee operations in request/response form.
//! - Map service error kinds to response statuses.
//!
//! # Invariants
//! - Validation and conflict errors keep their descriptive message.
//! - Server faults never expose storage details; those are logged instead.

use crate::db::ConnectionProvider;
use crate::logging::single_line;
use crate::model::company::CompanyId;
use crate::model::department::DepartmentId;
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::DeleteOutcome;
use crate::service::employee_service::{EmployeeService, EmployeeServiceError};
use log::error;
use serde::Serialize;

const SERVER_FAULT_MESSAGE: &str = "internal server error";
const MAX_LOGGED_ERROR_CHARS: usize = 300;

/// Response status, mirroring HTTP status classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Ok,
    ClientFault,
    NotFound,
    ServerFault,
}

impl ApiStatus {
    pub fn http_code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::ClientFault => 400,
            Self::NotFound => 404,
            Self::ServerFault => 500,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

/// Response envelope. Exactly one of `body`/`message` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub status: ApiStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(body: T) -> Self {
        Self {
            status: ApiStatus::Ok,
            body: Some(body),
            message: None,
        }
    }

    fn failure(status: ApiStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            body: None,
            message: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, EmployeeServiceError>> for ApiResponse<T> {
    fn from(result: Result<T, EmployeeServiceError>) -> Self {
        match result {
            Ok(body) => Self::ok(body),
            Err(EmployeeServiceError::Validation(err)) => {
                Self::failure(ApiStatus::ClientFault, err.to_string())
            }
            Err(EmployeeServiceError::Conflict(message)) => {
                Self::failure(ApiStatus::ClientFault, message)
            }
            Err(EmployeeServiceError::NotFound(message)) => {
                Self::failure(ApiStatus::NotFound, message)
            }
            Err(err @ EmployeeServiceError::Fatal(_)) => {
                error!(
                    "event=request module=api status=server_fault error=\"{}\"",
                    single_line(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
                );
                Self::failure(ApiStatus::ServerFault, SERVER_FAULT_MESSAGE)
            }
        }
    }
}

/// Employee endpoints.
pub struct EmployeeApi<P: ConnectionProvider> {
    service: EmployeeService<P>,
}

impl<P: ConnectionProvider> EmployeeApi<P> {
    pub fn new(provider: P) -> Self {
        Self {
            service: EmployeeService::new(provider),
        }
    }

    pub fn get_employees_by_company_id(&self, company_id: CompanyId) -> ApiResponse<Vec<Employee>> {
        self.service.get_employees_by_company_id(company_id).into()
    }

    pub fn get_employees_by_department_id(
        &self,
        department_id: DepartmentId,
    ) -> ApiResponse<Vec<Employee>> {
        self.service
            .get_employees_by_department_id(department_id)
            .into()
    }

    pub fn create_new_employee(&self, employee: &Employee) -> ApiResponse<EmployeeId> {
        self.service.create_new_employee(employee).into()
    }

    /// `None` stands for a request that carried no employee at all.
    pub fn update_employee(&self, employee: Option<&Employee>) -> ApiResponse<()> {
        match employee {
            Some(employee) => self.service.update_employee(employee).into(),
            None => ApiResponse::failure(ApiStatus::ClientFault, "no employee supplied for update"),
        }
    }

    pub fn delete_employee(&self, id: EmployeeId) -> ApiResponse<DeleteOutcome> {
        self.service.delete_employee(id).into()
    }
}
