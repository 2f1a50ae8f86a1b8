use staffbook_core::db::open_db_in_memory;
use staffbook_core::{
    Company, Department, Employee, EmployeeRepository, Passport, SqliteEmployeeRepository,
};

fn member(
    name: &str,
    phone: &str,
    department: (&str, &str),
    company: &str,
    passports: &[(&str, &str)],
) -> Employee {
    let mut employee = Employee::new(name, "Doe", phone);
    employee.department = Some(Department::new(department.0, department.1));
    employee.company = Some(Company::new(company));
    employee.passports = Some(
        passports
            .iter()
            .map(|(kind, number)| Passport::parse(kind, number).unwrap())
            .collect(),
    );
    employee
}

#[test]
fn read_by_company_groups_passports_per_employee() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();
    let ann = repo
        .add_employee(&member(
            "Ann",
            "555-0001",
            ("Finance", "555-1000"),
            "Acme",
            &[("National", "11"), ("International", "12")],
        ))
        .unwrap();
    let bob = repo
        .add_employee(&member(
            "Bob",
            "555-0002",
            ("Legal", "555-2000"),
            "Acme",
            &[("National", "21")],
        ))
        .unwrap();

    let employees = repo.get_employees_by_company_id(1).unwrap();
    assert_eq!(employees.len(), 2);

    let first = employees.iter().find(|e| e.id == Some(ann)).unwrap();
    let numbers: Vec<&str> = first
        .passports()
        .iter()
        .map(|p| p.number.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(first.passports().len(), 2);
    assert!(numbers.contains(&"11") && numbers.contains(&"12"));
    assert!(first
        .passports()
        .iter()
        .all(|p| p.employee_id == Some(ann)));
    assert_eq!(
        first.department.as_ref().unwrap().name.as_deref(),
        Some("Finance")
    );

    let second = employees.iter().find(|e| e.id == Some(bob)).unwrap();
    assert_eq!(second.passports().len(), 1);
    assert_eq!(
        second.department.as_ref().unwrap().phone.as_deref(),
        Some("555-2000")
    );
    assert_eq!(second.company.as_ref().unwrap().id, Some(1));
}

#[test]
fn read_by_department_filters_other_departments() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();
    repo.add_employee(&member("Ann", "555-0001", ("Finance", "555-1000"), "Acme", &[]))
        .unwrap();
    repo.add_employee(&member("Bob", "555-0002", ("Legal", "555-2000"), "Globex", &[]))
        .unwrap();

    let legal = repo.get_employees_by_department_id(2).unwrap();
    assert_eq!(legal.len(), 1);
    assert_eq!(legal[0].name.as_deref(), Some("Bob"));
    assert_eq!(legal[0].company.as_ref().unwrap().name.as_deref(), Some("Globex"));
}

#[test]
fn employee_without_passports_reads_back_with_empty_list() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();
    let id = repo
        .add_employee(&member("Ann", "555-0001", ("Finance", "555-1000"), "Acme", &[]))
        .unwrap();

    let employees = repo.get_employees_by_company_id(1).unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].id, Some(id));
    assert_eq!(employees[0].passports, Some(Vec::new()));
}

#[test]
fn read_of_unknown_company_is_empty() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();

    assert!(repo.get_employees_by_company_id(7).unwrap().is_empty());
    assert!(repo.get_employees_by_department_id(7).unwrap().is_empty());
}

#[test]
fn created_employee_reads_back_with_same_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteEmployeeRepository::try_new(&mut conn).unwrap();
    let input = member(
        "Ann",
        "+1 (555) 000-0001",
        ("Finance", "555-1000"),
        "Acme",
        &[("International", "00042")],
    );
    let id = repo.add_employee(&input).unwrap();

    let read = repo.get_employees_by_department_id(1).unwrap().remove(0);
    assert_eq!(read.id, Some(id));
    assert_eq!(read.name, input.name);
    assert_eq!(read.surname, input.surname);
    assert_eq!(read.phone, input.phone);
    assert_eq!(read.department_id, Some(1));
    assert_eq!(read.company_id, Some(1));

    let passport = &read.passports()[0];
    assert_eq!(passport.kind, input.passports()[0].kind);
    assert_eq!(passport.number.as_ref().unwrap().as_str(), "42");
}
