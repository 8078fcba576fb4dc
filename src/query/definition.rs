//! Validated outcomes query descriptor.
//!
//! [`QueryDefinition::build`] runs every check up front and either returns a
//! complete descriptor or the first [`QueryError`] hit:
//! 1. `field` (exactly one, known)
//! 2. `groupBy` (each known)
//! 3. time window and rollup
//! 4. filters, in dimension order category, reason, outcome
//! 5. a category must be filtered on or grouped by

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::logging::structured::LogContext;
use crate::storage::models::Dataset;
use crate::timeseries::window::constrained_window;
use crate::vocabulary::{
    groupby_columns, resolve_categories, resolve_field, resolve_groupby, resolve_outcomes,
    resolve_reasons, Aggregation, DataCategory, Field, GroupBy, Outcome,
};

use super::context::QueryContext;
use super::raw::RawQuery;

/// Filterable dimension. Declaration order is the order conditions are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Category,
    Reason,
    Outcome,
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Reason => "reason",
            Dimension::Outcome => "outcome",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "IN")]
    In,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::In => "IN",
        }
    }
}

/// Storage values a condition matches against. Never raw user tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConditionValues {
    Categories(Vec<DataCategory>),
    Reasons(Vec<&'static str>),
    Outcomes(Vec<Outcome>),
}

impl ConditionValues {
    pub fn len(&self) -> usize {
        match self {
            ConditionValues::Categories(v) => v.len(),
            ConditionValues::Reasons(v) => v.len(),
            ConditionValues::Outcomes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `(dimension, operator, values)` filter clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    pub dimension: Dimension,
    pub operator: Operator,
    pub values: ConditionValues,
}

impl Condition {
    pub fn category(values: Vec<DataCategory>) -> Self {
        Self {
            dimension: Dimension::Category,
            operator: Operator::In,
            values: ConditionValues::Categories(values),
        }
    }

    pub fn reason(values: Vec<&'static str>) -> Self {
        Self {
            dimension: Dimension::Reason,
            operator: Operator::In,
            values: ConditionValues::Reasons(values),
        }
    }

    pub fn outcome(values: Vec<Outcome>) -> Self {
        Self {
            dimension: Dimension::Outcome,
            operator: Operator::In,
            values: ConditionValues::Outcomes(values),
        }
    }
}

/// Access scoping taken from the caller's context, kept apart from `conditions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterKeys {
    pub org_id: Option<u64>,
    pub project_id: Vec<u64>,
}

/// A fully validated outcomes query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryDefinition {
    pub field: Field,
    /// Exactly one entry.
    pub aggregations: Vec<Aggregation>,
    pub groupby: Vec<GroupBy>,
    /// Storage columns to group on, without repeats.
    pub query_groupby: Vec<&'static str>,
    /// At most one condition per dimension.
    pub conditions: Vec<Condition>,
    pub filter_keys: FilterKeys,
    pub dataset: Dataset,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Bucket size in seconds.
    pub rollup: i64,
}

impl QueryDefinition {
    /// Validate `query` and build the descriptor.
    ///
    /// `allow_minute_resolution` is the caller's feature gate for sub-hour
    /// buckets. Building is pure apart from logging: the same query, context
    /// and flag always give an equal result.
    pub fn build(
        query: &RawQuery,
        ctx: &QueryContext,
        allow_minute_resolution: bool,
    ) -> Result<Self> {
        let log_ctx = ctx.log_context();

        match Self::resolve(query, ctx, allow_minute_resolution, &log_ctx) {
            Ok(definition) => {
                crate::log_debug!(
                    log_ctx,
                    "OUTCOMES_QUERY_BUILT",
                    dataset = definition.dataset.as_str(),
                    rollup = definition.rollup,
                    conditions = definition.conditions.len(),
                    groupby = &definition.query_groupby,
                );
                Ok(definition)
            }
            Err(e) => {
                crate::log_warn!(
                    log_ctx,
                    "OUTCOMES_QUERY_REJECTED",
                    kind = e.kind(),
                    reason = e.to_string(),
                );
                Err(e)
            }
        }
    }

    fn resolve(
        query: &RawQuery,
        ctx: &QueryContext,
        allow_minute_resolution: bool,
        log_ctx: &LogContext,
    ) -> Result<Self> {
        let field = resolve_field(&query.get_list("field"))?;
        let groupby = resolve_groupby(&query.get_list("groupBy"))?;

        let window = constrained_window(query, ctx.now, allow_minute_resolution, log_ctx)?;
        let dataset = Dataset::for_rollup(window.rollup);

        let conditions = resolve_conditions(query, log_ctx)?;
        let has_category_filter = conditions
            .iter()
            .any(|c| c.dimension == Dimension::Category);
        if !has_category_filter && !groupby.contains(&GroupBy::Category) {
            return Err(QueryError::InvalidQuery(
                "Query must have category as groupby or filter".to_string(),
            ));
        }

        Ok(Self {
            field,
            aggregations: vec![field.aggregation(dataset)],
            query_groupby: groupby_columns(&groupby),
            groupby,
            conditions,
            filter_keys: FilterKeys {
                org_id: ctx.organization_id,
                project_id: ctx.project_ids.clone(),
            },
            dataset,
            start: window.start,
            end: window.end,
            rollup: window.rollup,
        })
    }

    /// The aggregate this query computes.
    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregations[0]
    }

    pub fn condition(&self, dimension: Dimension) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.dimension == dimension)
    }
}

/// One `IN` condition per dimension that has values, in dimension order.
fn resolve_conditions(query: &RawQuery, ctx: &LogContext) -> Result<Vec<Condition>> {
    let mut conditions = Vec::new();

    let categories = resolve_categories(&query.get_list("category"), ctx)?;
    if !categories.is_empty() {
        conditions.push(Condition::category(categories));
    }

    let reasons = resolve_reasons(&query.get_list("reason"))?;
    if !reasons.is_empty() {
        conditions.push(Condition::reason(reasons));
    }

    let outcomes = resolve_outcomes(&query.get_list("outcome"))?;
    if !outcomes.is_empty() {
        conditions.push(Condition::outcome(outcomes));
    }

    Ok(conditions)
}
