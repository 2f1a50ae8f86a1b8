//! Staff records domain model.
//!
//! # Responsibility
//! - Define employee, department, company and passport records.
//! - Keep input validation a construction/`validate()` contract so invalid
//!   values are rejected before any storage call.
//!
//! # Invariants
//! - Every record is identified by a surrogate integer id assigned by storage.
//! - Employee phone, department phone and passport number are unique.

pub mod company;
pub mod department;
pub mod employee;
pub mod passport;
pub mod validation;
