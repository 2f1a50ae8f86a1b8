//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Cascade-create an employee with its department, company and passports.
//! - Apply partial updates across the employee graph.
//! - Delete an employee with its passports.
//! - Read employees by company or department through the join mapper.
//!
//! # Invariants
//! - Every write runs in exactly one transaction; returning early drops the
//!   transaction, which rolls back everything written so far.
//! - Statements inside one write run in program order; later steps depend on
//!   ids produced by earlier ones.
//! - Updates whose statements match no row are no-ops, not errors; an update
//!   with no present field does not open a transaction at all.
//! - Find-or-create lookups are check-then-act. A concurrent writer that wins
//!   the race is rejected by the unique constraint, which surfaces as the same
//!   `Conflict` as a pre-existing row.

use super::error::{RepoError, RepoResult};
use super::executor::Executor;
use super::mapper::{flatten_employee_rows, EmployeeRowGroup, EMPLOYEE_JOIN_SQL};
use super::update_builder::{UpdateBuilder, UpdateStatement};
use crate::db::migrations::{latest_version, schema_state, SchemaState};
use crate::model::company::{Company, CompanyId};
use crate::model::department::{Department, DepartmentId};
use crate::model::employee::{Employee, EmployeeId};
use crate::model::passport::{Passport, PassportNumber, PassportType};
use crate::model::validation::ValidationError;
use log::{debug, info, warn};
use rusqlite::{named_params, Connection, ToSql, Transaction, TransactionBehavior};
use serde::Serialize;
use std::collections::HashSet;

const REQUIRED_TABLES: [&str; 4] = ["department", "company", "employee", "passport"];

/// Result of an idempotent employee delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// Whether an employee row existed and was removed.
    pub employee_deleted: bool,
    pub passports_deleted: usize,
}

/// Repository interface for the employee object graph.
pub trait EmployeeRepository {
    /// Resolves related records and inserts the employee atomically.
    fn add_employee(&mut self, employee: &Employee) -> RepoResult<EmployeeId>;
    /// Applies present fields of `employee` and its inline relations.
    fn update_employee_by_id(&mut self, id: EmployeeId, employee: &Employee) -> RepoResult<()>;
    /// Deletes passports and the employee row. Missing ids are not an error.
    fn delete_employee(&mut self, id: EmployeeId) -> RepoResult<DeleteOutcome>;
    fn get_employees_by_company_id(&self, company_id: CompanyId) -> RepoResult<Vec<Employee>>;
    fn get_employees_by_department_id(
        &self,
        department_id: DepartmentId,
    ) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a migrated connection, rejecting ones without the staff schema.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn begin(&mut self) -> RepoResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    fn read_employees(&self, filter_column: &str, id: i64) -> RepoResult<Vec<Employee>> {
        let sql = format!("{EMPLOYEE_JOIN_SQL} WHERE e.{filter_column} = :id;");
        let groups: Vec<EmployeeRowGroup> =
            Executor::new(&*self.conn).query_row_groups(&sql, named_params! { ":id": id })?;
        flatten_employee_rows(groups)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn add_employee(&mut self, employee: &Employee) -> RepoResult<EmployeeId> {
        employee.validate()?;
        let passports = new_passports(employee.passports())?;

        let mut tx = self.begin()?;
        let department_id = resolve_department(&tx, employee)?;
        let company_id = resolve_company(&tx, employee)?;
        let employee_id = insert_employee(&tx, employee, department_id, company_id)?;

        if !passports.is_empty() {
            ensure_numbers_unregistered(&tx, &passports)?;
            insert_passports(&mut tx, employee_id, &passports)?;
        }

        tx.commit()?;
        info!(
            "event=employee_create module=repo status=ok employee_id={employee_id} department_id={department_id} company_id={company_id} passports={}",
            passports.len()
        );
        Ok(employee_id)
    }

    fn update_employee_by_id(&mut self, id: EmployeeId, employee: &Employee) -> RepoResult<()> {
        employee.validate()?;
        let steps = plan_employee_update(id, employee)?;
        if steps.is_empty() {
            debug!("event=employee_update module=repo status=skipped employee_id={id}");
            return Ok(());
        }

        let tx = self.begin()?;
        let matched = run_update_steps(&tx, &steps)?;
        tx.commit()?;
        info!(
            "event=employee_update module=repo status=ok employee_id={id} statements={} matched={matched}",
            steps.len()
        );
        Ok(())
    }

    fn delete_employee(&mut self, id: EmployeeId) -> RepoResult<DeleteOutcome> {
        let tx = self.begin()?;
        let outcome = {
            let exec = Executor::new(&tx);
            let passports_deleted = exec.execute(
                "DELETE FROM passport WHERE employee_id = :id;",
                named_params! { ":id": id },
            )?;
            let employees_deleted = exec.execute(
                "DELETE FROM employee WHERE id = :id;",
                named_params! { ":id": id },
            )?;
            DeleteOutcome {
                employee_deleted: employees_deleted > 0,
                passports_deleted,
            }
        };
        tx.commit()?;

        info!(
            "event=employee_delete module=repo status=ok employee_id={id} employee_deleted={} passports_deleted={}",
            outcome.employee_deleted, outcome.passports_deleted
        );
        Ok(outcome)
    }

    fn get_employees_by_company_id(&self, company_id: CompanyId) -> RepoResult<Vec<Employee>> {
        self.read_employees("company_id", company_id)
    }

    fn get_employees_by_department_id(
        &self,
        department_id: DepartmentId,
    ) -> RepoResult<Vec<Employee>> {
        self.read_employees("department_id", department_id)
    }
}

/// One planned partial update and the record it targets.
struct UpdateStep {
    entity: &'static str,
    id: i64,
    statement: UpdateStatement,
}

/// Builds the update statements in execution order: department, company,
/// employee fields, passports. Absent fields produce no step, so a request
/// with nothing to change plans nothing.
///
/// # Errors
/// - `MissingField` when an inline department, company or passport has no id.
fn plan_employee_update(id: EmployeeId, employee: &Employee) -> RepoResult<Vec<UpdateStep>> {
    let mut steps = Vec::new();
    let mut push = |entity, id, statement: Option<UpdateStatement>| {
        if let Some(statement) = statement {
            steps.push(UpdateStep {
                entity,
                id,
                statement,
            });
        }
    };

    if let Some(department) = &employee.department {
        let department_id = department
            .id
            .ok_or(ValidationError::MissingField("department.id"))?;
        let statement = UpdateBuilder::new("department")
            .set("name", department.name.clone())
            .set("phone", department.phone.clone())
            .build("id", department_id);
        push("department", department_id, statement);
    }
    if let Some(company) = &employee.company {
        let company_id = company.id.ok_or(ValidationError::MissingField("company.id"))?;
        let statement = UpdateBuilder::new("company")
            .set("name", company.name.clone())
            .build("id", company_id);
        push("company", company_id, statement);
    }

    let statement = UpdateBuilder::new("employee")
        .set("name", employee.name.clone())
        .set("surname", employee.surname.clone())
        .set("phone", employee.phone.clone())
        .build("id", id);
    push("employee", id, statement);

    // Only passports owned by `id` can match.
    for passport in employee.passports() {
        let passport_id = passport.id.ok_or(ValidationError::MissingField("passport.id"))?;
        let statement = UpdateBuilder::new("passport")
            .set("type", passport.kind.map(|kind| kind.as_str().to_string()))
            .set("number", passport.number.clone().map(String::from))
            .scope("employee_id", id)
            .build("id", passport_id);
        push("passport", passport_id, statement);
    }

    Ok(steps)
}

/// Runs planned steps in order and returns how many matched a row.
fn run_update_steps(tx: &Transaction<'_>, steps: &[UpdateStep]) -> RepoResult<usize> {
    let exec = Executor::new(tx);
    let mut matched = 0;
    for step in steps {
        if step.statement.execute(&exec)? == 0 {
            info!(
                "event=partial_update module=repo status=no_match entity={} id={}",
                step.entity, step.id
            );
        } else {
            matched += 1;
        }
    }
    Ok(matched)
}

/// A passport ready for insertion: both fields present.
struct NewPassport<'a> {
    kind: PassportType,
    number: &'a PassportNumber,
}

/// Checks create-time passport input before any storage call.
fn new_passports(passports: &[Passport]) -> RepoResult<Vec<NewPassport<'_>>> {
    let mut seen = HashSet::new();
    let mut prepared = Vec::with_capacity(passports.len());
    for passport in passports {
        let kind = passport
            .kind
            .ok_or(ValidationError::MissingField("passport.type"))?;
        let number = passport
            .number
            .as_ref()
            .ok_or(ValidationError::MissingField("passport.number"))?;
        if !seen.insert(number.as_str()) {
            return Err(RepoError::Conflict(format!(
                "passport number {number} is supplied more than once"
            )));
        }
        prepared.push(NewPassport { kind, number });
    }
    Ok(prepared)
}

fn resolve_department(tx: &Transaction<'_>, employee: &Employee) -> RepoResult<DepartmentId> {
    let exec = Executor::new(tx);
    match (&employee.department, employee.department_id) {
        (Some(department), _) => find_or_create_department(&exec, department),
        (None, Some(id)) => {
            ensure_reference_exists(&exec, "department", id)?;
            Ok(id)
        }
        (None, None) => Err(ValidationError::MissingField("department").into()),
    }
}

fn find_or_create_department(exec: &Executor<'_>, department: &Department) -> RepoResult<DepartmentId> {
    let phone = department
        .phone
        .as_deref()
        .ok_or(ValidationError::MissingField("department.phone"))?;

    let existing = exec.query_one(
        "SELECT id, name FROM department WHERE phone = :phone;",
        named_params! { ":phone": phone },
        |row| Ok((row.get::<_, DepartmentId>(0)?, row.get::<_, Option<String>>(1)?)),
    )?;

    match existing {
        Some((id, name)) if name == department.name => {
            debug!("event=lookup module=repo status=found entity=department department_id={id}");
            Ok(id)
        }
        Some((id, _)) => {
            debug!("event=lookup module=repo status=mismatch entity=department department_id={id}");
            Err(RepoError::Conflict(
                "department phone already registered to a different department".to_string(),
            ))
        }
        None => {
            info!("event=lookup module=repo status=not_found entity=department");
            exec.insert(
                "INSERT INTO department (name, phone) VALUES (:name, :phone);",
                named_params! { ":name": department.name, ":phone": phone },
            )
        }
    }
}

fn resolve_company(tx: &Transaction<'_>, employee: &Employee) -> RepoResult<CompanyId> {
    let exec = Executor::new(tx);
    match (&employee.company, employee.company_id) {
        (Some(company), _) => find_or_create_company(&exec, company),
        (None, Some(id)) => {
            ensure_reference_exists(&exec, "company", id)?;
            Ok(id)
        }
        (None, None) => Err(ValidationError::MissingField("company").into()),
    }
}

/// Company names are not unique in storage, so more than one match is
/// reported as ambiguous instead of silently picking a row.
fn find_or_create_company(exec: &Executor<'_>, company: &Company) -> RepoResult<CompanyId> {
    let name = company
        .name
        .as_deref()
        .ok_or(ValidationError::MissingField("company.name"))?;

    let matches = exec.query_many(
        "SELECT id FROM company WHERE name = :name ORDER BY id LIMIT 2;",
        named_params! { ":name": name },
        |row| Ok(row.get::<_, CompanyId>(0)?),
    )?;

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => {
            info!("event=lookup module=repo status=not_found entity=company");
            exec.insert(
                "INSERT INTO company (name) VALUES (:name);",
                named_params! { ":name": name },
            )
        }
        _ => {
            warn!("event=lookup module=repo status=ambiguous entity=company");
            Err(RepoError::Conflict(format!(
                "company name `{name}` is ambiguous: several companies share it"
            )))
        }
    }
}

fn insert_employee(
    tx: &Transaction<'_>,
    employee: &Employee,
    department_id: DepartmentId,
    company_id: CompanyId,
) -> RepoResult<EmployeeId> {
    Executor::new(tx).insert(
        "INSERT INTO employee (name, surname, phone, company_id, department_id)
         VALUES (:name, :surname, :phone, :company_id, :department_id);",
        named_params! {
            ":name": employee.name,
            ":surname": employee.surname,
            ":phone": employee.phone,
            ":company_id": company_id,
            ":department_id": department_id,
        },
    )
}

fn ensure_numbers_unregistered(
    tx: &Transaction<'_>,
    passports: &[NewPassport<'_>]) -> RepoResult<()> {
    let names: Vec<String> = (0..passports.len()).map(|i| format!(":number_{i}")).collect();
    let numbers: Vec<&str> = passports.iter().map(|p| p.number.as_str()).collect();
    let params: Vec<(&str, &dyn ToSql)> = names
        .iter()
        .zip(&numbers)
        .map(|(name, number)| (name.as_str(), number as &dyn ToSql))
        .collect();
    let sql = format!(
        "SELECT number FROM passport WHERE number IN ({}) ORDER BY number;",
        names.join(", ")
    );

    let existing =
        Executor::new(tx).query_many(&sql, &params, |row| Ok(row.get::<_, String>(0)?))?;
    if existing.is_empty() {
        return Ok(());
    }
    Err(RepoError::Conflict(format!(
        "passport number already exists: {}",
        existing.join(", ")
    )))
}

/// Inserts passports inside a savepoint nested in the outer transaction.
fn insert_passports(
    tx: &mut Transaction<'_>,
    employee_id: EmployeeId,
    passports: &[NewPassport<'_>],
) -> RepoResult<()> {
    let savepoint = tx.savepoint()?;
    {
        let exec = Executor::new(&savepoint);
        for passport in passports {
            exec.insert(
                "INSERT INTO passport (employee_id, type, number) VALUES (:employee_id, :type, :number);",
                named_params! {
                    ":employee_id": employee_id,
                    ":type": passport.kind.as_str(),
                    ":number": passport.number.as_str(),
                },
            )?;
        }
    }
    savepoint.commit()?;
    Ok(())
}

fn ensure_reference_exists(exec: &Executor<'_>, table: &'static str, id: i64) -> RepoResult<()> {
    let found: Option<i64> = exec.query_scalar(
        &format!("SELECT id FROM {table} WHERE id = :id;"),
        named_params! { ":id": id },
    )?;
    match found {
        Some(_) => Ok(()),
        None => Err(ValidationError::UnknownReference { entity: table, id }.into()),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = match schema_state(conn)? {
        SchemaState::Current => None,
        SchemaState::Behind { found } | SchemaState::Ahead { found } => Some(found),
    };
    if let Some(actual_version) = actual_version {
        return Err(RepoError::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        });
    }

    let exec = Executor::new(conn);
    for table in REQUIRED_TABLES {
        let exists: Option<i64> = exec.query_scalar(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = :name;",
            named_params! { ":name": table },
        )?;
        if exists.is_none() {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
