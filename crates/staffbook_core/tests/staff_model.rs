use staffbook_core::{
    Company, Department, Employee, Passport, PassportNumber, PassportType, ValidationError,
};

#[test]
fn employee_new_sets_personal_fields_only() {
    let employee = Employee::new("Ann", "Smith", "555-0101");

    assert_eq!(employee.id, None);
    assert_eq!(employee.name.as_deref(), Some("Ann"));
    assert_eq!(employee.surname.as_deref(), Some("Smith"));
    assert_eq!(employee.phone.as_deref(), Some("555-0101"));
    assert!(employee.department.is_none());
    assert!(employee.company.is_none());
    assert!(employee.passports().is_empty());
}

#[test]
fn passport_parse_validates_both_fields() {
    let passport = Passport::parse("International", "007700").unwrap();
    assert_eq!(passport.kind, Some(PassportType::International));
    assert_eq!(passport.number.as_ref().map(PassportNumber::as_str), Some("7700"));

    assert_eq!(
        Passport::parse("Diplomatic", "1").unwrap_err(),
        ValidationError::InvalidPassportType("Diplomatic".to_string())
    );
    assert_eq!(
        Passport::parse("National", "12-34").unwrap_err(),
        ValidationError::NonNumericPassportNumber("12-34".to_string())
    );
}

#[test]
fn employee_serialization_uses_expected_wire_fields() {
    let mut employee = Employee::new("Ann", "Smith", "555-0101");
    employee.id = Some(3);
    employee.department = Some(Department::new("Finance", "555-1000"));
    employee.company = Some(Company::new("Acme"));
    employee.passports = Some(vec![Passport::parse("National", "4512").unwrap()]);

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["department"]["phone"], "555-1000");
    assert_eq!(json["company"]["name"], "Acme");
    assert_eq!(json["passports"][0]["type"], "National");
    assert_eq!(json["passports"][0]["number"], "4512");

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn reference_ids_are_accepted_on_input_but_not_written() {
    let employee: Employee =
        serde_json::from_str(r#"{ "name": "Ann", "company_id": 4, "department_id": 2 }"#).unwrap();
    assert_eq!(employee.company_id, Some(4));
    assert_eq!(employee.department_id, Some(2));

    let read_back = Employee {
        company: Some(Company {
            id: Some(4),
            name: Some("Acme".to_string()),
        }),
        ..employee
    };
    let json = serde_json::to_value(&read_back).unwrap();
    assert!(json.get("company_id").is_none());
    assert!(json.get("department_id").is_none());
    assert_eq!(json["company"]["id"], 4);
}

#[test]
fn deserialize_accepts_partial_input() {
    let employee: Employee = serde_json::from_str(r#"{ "id": 9, "surname": "Jones" }"#).unwrap();

    assert_eq!(employee.id, Some(9));
    assert_eq!(employee.surname.as_deref(), Some("Jones"));
    assert!(employee.name.is_none());
    assert!(employee.passports.is_none());
}

#[test]
fn deserialize_rejects_invalid_passport_type() {
    let err = serde_json::from_str::<Employee>(
        r#"{ "passports": [ { "type": "Diplomatic", "number": "1" } ] }"#,
    )
    .unwrap_err();
    assert!(
        err.to_string().contains("National or International"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_canonicalizes_and_bounds_passport_number() {
    let passport: Passport =
        serde_json::from_str(r#"{ "type": "National", "number": "0000123" }"#).unwrap();
    assert_eq!(passport.number.unwrap().as_str(), "123");

    let err = serde_json::from_str::<Passport>(r#"{ "type": "National", "number": "12345678901" }"#)
        .unwrap_err();
    assert!(err.to_string().contains("at most 10 digits"), "{err}");
}

#[test]
fn validate_checks_inline_department_and_company() {
    let mut employee = Employee::new("Ann", "Smith", "555-0101");
    employee.department = Some(Department::new("Finance", "not a phone"));
    assert!(matches!(
        employee.validate(),
        Err(ValidationError::InvalidPhone {
            field: "department.phone",
            ..
        })
    ));

    employee.department = Some(Department::new("Finance", "555-1000"));
    employee.company = Some(Company::new("x".repeat(256)));
    assert_eq!(
        employee.validate(),
        Err(ValidationError::FieldTooLong {
            field: "company.name",
            max: 255,
            actual: 256,
        })
    );
}

#[test]
fn validate_ignores_absent_fields() {
    assert!(Employee::default().validate().is_ok());
}
