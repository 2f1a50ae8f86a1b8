//! Join-flattening mapper for employee reads.
//!
//! # Responsibility
//! - Decode one `employee LEFT JOIN passport/department/company` row into a
//!   typed row group.
//! - Fold row groups into a deduplicated employee list with passports
//!   attached.
//!
//! # Invariants
//! - Row group column order is fixed: employee, passport, department, company.
//! - Deduplication relies only on the employee id; row order from storage
//!   is never assumed to keep an employee's rows contiguous.
//! - Output order is first-seen order of employee ids.

use super::error::{RepoError, RepoResult};
use super::executor::FromRowGroup;
use crate::model::company::Company;
use crate::model::department::Department;
use crate::model::employee::{Employee, EmployeeId};
use crate::model::passport::{Passport, PassportNumber, PassportType};
use rusqlite::Row;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// One decoded join row. Outer-joined sides are `None` when absent.
pub type EmployeeRowGroup = (
    Employee,
    Option<Passport>,
    Option<Department>,
    Option<Company>,
);

/// Select list matching [`EmployeeRowGroup`] column offsets.
pub(crate) const EMPLOYEE_JOIN_SQL: &str = "SELECT
    e.id, e.name, e.surname, e.phone, e.company_id, e.department_id,
    p.id, p.employee_id, p.type, p.number,
    d.id, d.name, d.phone,
    c.id, c.name
FROM employee e
LEFT JOIN passport p ON e.id = p.employee_id
LEFT JOIN department d ON e.department_id = d.id
LEFT JOIN company c ON e.company_id = c.id";

const PASSPORT_OFFSET: usize = 6;
const DEPARTMENT_OFFSET: usize = 10;
const COMPANY_OFFSET: usize = 13;

impl FromRowGroup for EmployeeRowGroup {
    fn from_row_group(row: &Row<'_>) -> RepoResult<Self> {
        let employee = Employee {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            surname: row.get(2)?,
            phone: row.get(3)?,
            company_id: row.get(4)?,
            department_id: row.get(5)?,
            ..Employee::default()
        };
        Ok((
            employee,
            read_passport(row)?,
            read_department(row)?,
            read_company(row)?,
        ))
    }
}

fn read_passport(row: &Row<'_>) -> RepoResult<Option<Passport>> {
    let Some(id) = row.get::<_, Option<i64>>(PASSPORT_OFFSET)? else {
        return Ok(None);
    };
    let kind: String = row.get(PASSPORT_OFFSET + 2)?;
    let number: String = row.get(PASSPORT_OFFSET + 3)?;
    Ok(Some(Passport {
        id: Some(id),
        employee_id: row.get(PASSPORT_OFFSET + 1)?,
        kind: Some(PassportType::parse(&kind).map_err(|err| {
            RepoError::InvalidData(format!("passport {id} has bad type: {err}"))
        })?),
        number: Some(PassportNumber::parse(&number).map_err(|err| {
            RepoError::InvalidData(format!("passport {id} has bad number: {err}"))
        })?),
    }))
}

fn read_department(row: &Row<'_>) -> RepoResult<Option<Department>> {
    let Some(id) = row.get::<_, Option<i64>>(DEPARTMENT_OFFSET)? else {
        return Ok(None);
    };
    Ok(Some(Department {
        id: Some(id),
        name: row.get(DEPARTMENT_OFFSET + 1)?,
        phone: row.get(DEPARTMENT_OFFSET + 2)?,
    }))
}

fn read_company(row: &Row<'_>) -> RepoResult<Option<Company>> {
    let Some(id) = row.get::<_, Option<i64>>(COMPANY_OFFSET)? else {
        return Ok(None);
    };
    Ok(Some(Company {
        id: Some(id),
        name: row.get(COMPANY_OFFSET + 1)?,
    }))
}

/// Folds join row groups into distinct employees with passports attached.
///
/// Department and company are taken from the first row seen for an
/// employee; the join repeats them identically on every row.
///
/// # Errors
/// - `InvalidData` when a row group carries an employee without an id.
pub fn flatten_employee_rows<I>(groups: I) -> RepoResult<Vec<Employee>>
where
    I: IntoIterator<Item = EmployeeRowGroup>,
{
    let mut slots: HashMap<EmployeeId, usize> = HashMap::new();
    let mut employees: Vec<Employee> = Vec::new();

    for (employee, passport, department, company) in groups {
        let id = employee
            .id
            .ok_or_else(|| RepoError::InvalidData("employee row without id".to_string()))?;

        let slot = match slots.entry(id) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                employees.push(Employee {
                    department,
                    company,
                    passports: Some(Vec::new()),
                    ..employee
                });
                *entry.insert(employees.len() - 1)
            }
        };

        if let Some(passport) = passport {
            employees[slot]
                .passports
                .get_or_insert_with(Vec::new)
                .push(passport);
        }
    }

    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::{flatten_employee_rows, EmployeeRowGroup};
    use crate::model::company::Company;
    use crate::model::department::Department;
    use crate::model::employee::Employee;
    use crate::model::passport::Passport;
    use crate::repo::error::RepoError;

    fn employee(id: i64, name: &str) -> Employee {
        Employee {
            id: Some(id),
            name: Some(name.to_string()),
            ..Employee::default()
        }
    }

    fn passport(id: i64, employee_id: i64, number: &str) -> Passport {
        let mut passport = Passport::parse("National", number).unwrap();
        passport.id = Some(id);
        passport.employee_id = Some(employee_id);
        passport
    }

    fn department(id: i64) -> Department {
        Department {
            id: Some(id),
            ..Department::new("Finance", "555-0100")
        }
    }

    fn company(id: i64) -> Company {
        Company {
            id: Some(id),
            ..Company::new("Acme")
        }
    }

    fn group(
        employee: Employee,
        passport: Option<Passport>,
        department_id: i64,
        company_id: i64,
    ) -> EmployeeRowGroup {
        (
            employee,
            passport,
            Some(department(department_id)),
            Some(company(company_id)),
        )
    }

    #[test]
    fn interleaved_rows_are_grouped_by_employee_id() {
        let rows = vec![
            group(employee(2, "Bob"), Some(passport(10, 2, "100")), 1, 1),
            group(employee(1, "Ann"), Some(passport(11, 1, "101")), 1, 1),
            group(employee(2, "Bob"), Some(passport(12, 2, "102")), 1, 1),
            group(employee(3, "Cid"), None, 2, 1),
            group(employee(1, "Ann"), Some(passport(13, 1, "103")), 1, 1),
        ];

        let employees = flatten_employee_rows(rows).unwrap();

        let ids: Vec<_> = employees.iter().map(|e| e.id.unwrap()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        let passport_counts: Vec<_> = employees.iter().map(|e| e.passports().len()).collect();
        assert_eq!(passport_counts, vec![2, 2, 0]);
        assert_eq!(employees[0].passports()[1].id, Some(12));
        assert_eq!(employees[2].department.as_ref().unwrap().id, Some(2));
    }

    #[test]
    fn employee_without_passports_appears_once_with_empty_list() {
        let employees = flatten_employee_rows(vec![group(employee(5, "Eve"), None, 1, 1)]).unwrap();

        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].passports, Some(Vec::new()));
        assert_eq!(employees[0].company.as_ref().unwrap().name.as_deref(), Some("Acme"));
    }

    #[test]
    fn missing_outer_sides_stay_absent() {
        let rows: Vec<EmployeeRowGroup> = vec![(employee(8, "Lone"), None, None, None)];
        let employees = flatten_employee_rows(rows).unwrap();
        assert!(employees[0].department.is_none());
        assert!(employees[0].company.is_none());
    }

    #[test]
    fn empty_input_yields_no_employees() {
        assert!(flatten_employee_rows(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn row_without_employee_id_is_invalid_data() {
        let rows: Vec<EmployeeRowGroup> = vec![(Employee::default(), None, None, None)];
        assert!(matches!(
            flatten_employee_rows(rows),
            Err(RepoError::InvalidData(_))
        ));
    }
}
