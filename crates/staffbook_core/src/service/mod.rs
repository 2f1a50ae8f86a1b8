//! Core use-case services.
//!
//! # Responsibility
//! - Run each use case as one unit of work on its own connection.
//! - Translate repository errors into the four caller-facing error kinds.

pub mod employee_service;
