//! Core data-access logic for staffbook.
//! This crate is the single source of truth for staff record invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{ApiResponse, ApiStatus, EmployeeApi};
pub use config::{ConfigError, StoreConfig};
pub use db::{ConnectionProvider, SqliteConnectionProvider};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::company::{Company, CompanyId};
pub use model::department::{Department, DepartmentId};
pub use model::employee::{Employee, EmployeeId};
pub use model::passport::{Passport, PassportId, PassportNumber, PassportType};
pub use model::validation::ValidationError;
pub use repo::employee_repo::{DeleteOutcome, EmployeeRepository, SqliteEmployeeRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::mapper::{flatten_employee_rows, EmployeeRowGroup};
pub use service::employee_service::{EmployeeService, EmployeeServiceError, ServiceResult};
