//! Outcomes Core - Validated outcomes time-series queries
//!
//! This crate turns the raw query parameters of an outcomes stats request
//! (accepted/rejected event counts grouped by category, reason or outcome over
//! a time window) into a validated, structured query, exposed to Python via
//! PyO3. The implementation prioritizes:
//!
//! 1. **Strictness** - A closed vocabulary; unknown tokens never reach storage
//! 2. **Logging** - Every rejection logged with request context
//! 3. **Purity** - No I/O; building the same request twice gives equal results
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `query` - Raw parameters, caller context and the `QueryDefinition` builder
//! - `vocabulary` - Fields, group-bys, categories, reasons, outcomes and their mappings
//! - `timeseries` - Stats period parsing, date range and rollup policy
//! - `storage` - Dataset selection and datastore request bodies
//! - `logging` - Structured logging with request context
//! - `error` - `QueryError`

pub mod error;
pub mod logging;
pub mod query;
pub mod storage;
pub mod timeseries;
pub mod vocabulary;

#[cfg(feature = "python")]
mod python;

pub use error::QueryError;
pub use query::{Condition, ConditionValues, Dimension, QueryContext, QueryDefinition, RawQuery};
pub use storage::{build_request_body, Dataset};
pub use vocabulary::{Aggregation, DataCategory, Field, GroupBy, Outcome};
