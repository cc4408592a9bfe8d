//! Domain types for the project service: the `Project` write payload,
//! status values, field validation and the shared error taxonomy.
//!
//! This crate performs no I/O.

pub mod error;
pub mod project;
pub mod types;
