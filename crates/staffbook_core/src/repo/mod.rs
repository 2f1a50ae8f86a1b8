//! Repository layer: persistence and object mapping for staff records.
//!
//! # Responsibility
//! - Execute parameterized SQL and classify storage failures.
//! - Map multi-table join rows into the employee object graph.
//! - Orchestrate cascade writes inside explicit transactions.
//!
//! # Invariants
//! - Repository writes call `validate()` before SQL mutations.
//! - Unique-constraint failures never leave this layer as raw storage errors.

pub mod employee_repo;
pub mod error;
pub mod executor;
pub mod mapper;
pub mod update_builder;
