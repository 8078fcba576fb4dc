//! Grouping dimensions accepted through `groupBy=`.

use serde::Serialize;

use crate::error::{QueryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Category,
    Outcome,
    Reason,
    Project,
    KeyId,
}

impl GroupBy {
    pub const ALL: [GroupBy; 5] = [
        GroupBy::Category,
        GroupBy::Outcome,
        GroupBy::Reason,
        GroupBy::Project,
        GroupBy::KeyId,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "category" => Some(GroupBy::Category),
            "outcome" => Some(GroupBy::Outcome),
            "reason" => Some(GroupBy::Reason),
            "project" => Some(GroupBy::Project),
            "key_id" => Some(GroupBy::KeyId),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Category => "category",
            GroupBy::Outcome => "outcome",
            GroupBy::Reason => "reason",
            GroupBy::Project => "project",
            GroupBy::KeyId => "key_id",
        }
    }

    /// Storage column grouped on.
    pub fn column(&self) -> &'static str {
        match self {
            GroupBy::Project => "project_id",
            other => other.as_str(),
        }
    }
}

/// Validate every `groupBy` value independently. Repeats are kept.
pub fn resolve_groupby(raw_groupby: &[&str]) -> Result<Vec<GroupBy>> {
    raw_groupby
        .iter()
        .map(|raw| {
            GroupBy::parse(raw)
                .ok_or_else(|| QueryError::InvalidField(format!("Invalid groupBy: \"{}\"", raw)))
        })
        .collect()
}

/// Storage columns to group on, de-duplicated in first-seen order.
pub fn groupby_columns(groupby: &[GroupBy]) -> Vec<&'static str> {
    let mut columns: Vec<&'static str> = Vec::with_capacity(groupby.len());
    for column in groupby.iter().map(GroupBy::column) {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    columns
}
