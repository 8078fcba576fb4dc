//! Storage module.
//!
//! Dataset selection and datastore request builders.
//! Note: Actual query execution is handled by Python.
//! This module provides request building helpers.

pub mod models;
pub mod queries;

pub use models::*;
pub use queries::*;
