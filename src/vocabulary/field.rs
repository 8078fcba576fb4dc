//! Aggregate fields and their storage aggregates.

use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::storage::models::Dataset;

/// An aggregate the caller can request through `field=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// `sum(quantity)`: event count, or bytes for attachments.
    Quantity,
    /// `sum(times_seen)`: number of outcome rows seen.
    TimesSeen,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Quantity, Field::TimesSeen];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sum(quantity)" => Some(Field::Quantity),
            "sum(times_seen)" => Some(Field::TimesSeen),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Quantity => "sum(quantity)",
            Field::TimesSeen => "sum(times_seen)",
        }
    }

    /// Storage column the aggregate reads, also used as the output alias.
    pub fn column(&self) -> &'static str {
        match self {
            Field::Quantity => "quantity",
            Field::TimesSeen => "times_seen",
        }
    }

    /// Pick the aggregate expression for the dataset the rollup resolved to.
    ///
    /// The raw (per-minute) dataset stores one row per outcome and has no
    /// `times_seen` column, so rows are counted instead. `quantity` is summed
    /// on both datasets.
    pub fn aggregation(&self, dataset: Dataset) -> Aggregation {
        match (self, dataset) {
            (Field::TimesSeen, Dataset::OutcomesRaw) => {
                Aggregation::new("count()", "", self.column())
            }
            _ => Aggregation::new("sum", self.column(), self.column()),
        }
    }
}

/// Parse the `field` values of a request. Exactly one field is accepted.
pub fn resolve_field(raw_fields: &[&str]) -> Result<Field> {
    match raw_fields {
        [] => Err(QueryError::InvalidField(
            "At least one \"field\" is required.".to_string(),
        )),
        [raw] => Field::parse(raw)
            .ok_or_else(|| QueryError::InvalidField(format!("Invalid field: \"{}\"", raw))),
        _ => Err(QueryError::InvalidField(format!(
            "Only one \"field\" may be requested, got {}",
            raw_fields.len()
        ))),
    }
}

/// Aggregate expression as `(function, column, alias)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Aggregation {
    pub function: &'static str,
    pub column: &'static str,
    pub alias: &'static str,
}

impl Aggregation {
    pub fn new(function: &'static str, column: &'static str, alias: &'static str) -> Self {
        Self {
            function,
            column,
            alias,
        }
    }

    pub fn as_tuple(&self) -> (&'static str, &'static str, &'static str) {
        (self.function, self.column, self.alias)
    }
}
