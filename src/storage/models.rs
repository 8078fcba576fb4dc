//! Outcomes datasets.
//!
//! Outcomes are stored twice: pre-summed per hour, and per minute with one
//! row per outcome. The rollup decides which one a query reads.

use serde::Serialize;

use crate::timeseries::period::ONE_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Hourly rollups with a summed `times_seen` column.
    Outcomes,
    /// Minute granularity, no `times_seen` column.
    OutcomesRaw,
}

impl Dataset {
    /// Hourly or coarser buckets read the pre-summed dataset.
    pub fn for_rollup(rollup: i64) -> Self {
        if rollup >= ONE_HOUR {
            Dataset::Outcomes
        } else {
            Dataset::OutcomesRaw
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Outcomes => "outcomes",
            Dataset::OutcomesRaw => "outcomes_raw",
        }
    }
}
