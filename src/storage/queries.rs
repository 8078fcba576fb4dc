//! Datastore request builders.
//!
//! Renders a [`QueryDefinition`] as the JSON body the query service expects.
//! Actual execution is handled by Python.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::query::definition::QueryDefinition;

/// Window bounds as sent to the query service: whole seconds, `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Build the request body for a validated definition.
///
/// Categories and outcomes are sent as their integer codes, reasons as strings.
pub fn build_request_body(definition: &QueryDefinition) -> Value {
    let aggregations: Vec<Value> = definition
        .aggregations
        .iter()
        .map(|a| json!([a.function, a.column, a.alias]))
        .collect();

    let conditions: Vec<Value> = definition
        .conditions
        .iter()
        .map(|c| json!([c.dimension.as_str(), c.operator.as_str(), c.values]))
        .collect();

    let mut filter_keys = Map::new();
    if let Some(org_id) = definition.filter_keys.org_id {
        filter_keys.insert("org_id".to_string(), json!([org_id]));
    }
    if !definition.filter_keys.project_id.is_empty() {
        filter_keys.insert(
            "project_id".to_string(),
            json!(definition.filter_keys.project_id),
        );
    }

    json!({
        "dataset": definition.dataset.as_str(),
        "from_date": format_timestamp(&definition.start),
        "to_date": format_timestamp(&definition.end),
        "granularity": definition.rollup,
        "aggregations": aggregations,
        "conditions": conditions,
        "groupby": definition.query_groupby,
        "filter_keys": filter_keys,
    })
}

/// [`build_request_body`] serialized to a string.
pub fn build_request_json(definition: &QueryDefinition) -> String {
    build_request_body(definition).to_string()
}
