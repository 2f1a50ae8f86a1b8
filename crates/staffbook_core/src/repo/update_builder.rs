//! Partial update statement builder.
//!
//! # Responsibility
//! - Build `UPDATE ... SET` statements from only the fields that are present.
//!
//! # Invariants
//! - Assignments keep the order in which `set` was called.
//! - A statement always carries the identity predicate.
//! - An empty assignment list yields no statement at all; callers skip
//!   execution instead of sending an invalid `UPDATE`.

use super::error::RepoResult;
use super::executor::Executor;
use rusqlite::types::Value;
use rusqlite::ToSql;

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: &'static str,
    assignments: Vec<(&'static str, Value)>,
    predicates: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            predicates: Vec::new(),
        }
    }

    /// Adds `column = value` when `value` is present; `None` is skipped.
    pub fn set<T: Into<Value>>(mut self, column: &'static str, value: Option<T>) -> Self {
        if let Some(value) = value {
            self.assignments.push((column, value.into()));
        }
        self
    }

    /// Narrows the statement with an extra `column = value` predicate.
    pub fn scope(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.predicates.push((column, value.into()));
        self
    }

    /// Finishes the statement with the mandatory identity predicate.
    ///
    /// Returns `None` when no field was present ("nothing to update").
    pub fn build(self, key_column: &'static str, key: i64) -> Option<UpdateStatement> {
        if self.assignments.is_empty() {
            return None;
        }

        let mut bindings = Vec::with_capacity(self.assignments.len() + self.predicates.len() + 1);
        let set_clause = self
            .assignments
            .into_iter()
            .map(|(column, value)| {
                let name = format!(":set_{column}");
                let clause = format!("{column} = {name}");
                bindings.push((name, value));
                clause
            })
            .collect::<Vec<_>>()
            .join(", ");

        let where_clause = std::iter::once((key_column, Value::Integer(key)))
            .chain(self.predicates)
            .map(|(column, value)| {
                let name = format!(":where_{column}");
                let clause = format!("{column} = {name}");
                bindings.push((name, value));
                clause
            })
            .collect::<Vec<_>>()
            .join(" AND ");

        Some(UpdateStatement {
            sql: format!(
                "UPDATE {} SET {set_clause} WHERE {where_clause};",
                self.table
            ),
            bindings,
        })
    }
}

/// A ready-to-run partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    sql: String,
    bindings: Vec<(String, Value)>,
}

impl UpdateStatement {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn bindings(&self) -> &[(String, Value)] {
        &self.bindings
    }

    /// Executes the statement and returns the number of matched rows.
    pub fn execute(&self, exec: &Executor<'_>) -> RepoResult<usize> {
        let params: Vec<(&str, &dyn ToSql)> = self
            .bindings
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();
        exec.execute(&self.sql, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateBuilder;
    use rusqlite::types::Value;

    #[test]
    fn only_present_fields_are_assigned() {
        let statement = UpdateBuilder::new("employee")
            .set("name", None::<String>)
            .set("surname", Some("Petrov".to_string()))
            .set("phone", Some("555-0100".to_string()))
            .build("id", 7)
            .expect("two fields are present");

        assert_eq!(
            statement.sql(),
            "UPDATE employee SET surname = :set_surname, phone = :set_phone WHERE id = :where_id;"
        );
        assert_eq!(
            statement.bindings()[2],
            (":where_id".to_string(), Value::Integer(7))
        );
    }

    #[test]
    fn no_present_fields_means_nothing_to_update() {
        let statement = UpdateBuilder::new("department")
            .set("name", None::<String>)
            .set("phone", None::<String>)
            .build("id", 1);
        assert!(statement.is_none());
    }

    #[test]
    fn scope_predicates_follow_the_identity_predicate() {
        let statement = UpdateBuilder::new("passport")
            .set("number", Some("123".to_string()))
            .scope("employee_id", 4_i64)
            .build("id", 9)
            .unwrap();
        assert_eq!(
            statement.sql(),
            "UPDATE passport SET number = :set_number WHERE id = :where_id AND employee_id = :where_employee_id;"
        );
    }
}
