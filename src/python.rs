//! Python bindings.
//!
//! The stats endpoint parses the request in Python, hands the raw query
//! string over, and executes whatever comes back.

use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::error::QueryError;
use crate::query::{ConditionValues, QueryContext, QueryDefinition, RawQuery};
use crate::storage::{build_request_json, format_timestamp};
use crate::vocabulary::{CategoryToken, DataCategory, Field, GroupBy, Outcome, ReasonToken};

create_exception!(outcomes_core, InvalidField, PyValueError);
create_exception!(outcomes_core, InvalidQuery, PyValueError);
create_exception!(outcomes_core, InvalidParams, PyValueError);

impl From<QueryError> for PyErr {
    fn from(err: QueryError) -> PyErr {
        match err {
            QueryError::InvalidField(msg) => InvalidField::new_err(msg),
            QueryError::InvalidQuery(msg) => InvalidQuery::new_err(msg),
            QueryError::InvalidParams(msg) => InvalidParams::new_err(msg),
        }
    }
}

/// Initialize the module-level logger
fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}

fn build_definition(
    query: &str,
    organization_id: Option<u64>,
    project_ids: Vec<u64>,
    allow_minute_resolution: bool,
) -> Result<QueryDefinition, QueryError> {
    let ctx = QueryContext::new(organization_id, project_ids);
    QueryDefinition::build(&RawQuery::parse(query), &ctx, allow_minute_resolution)
}

/// Build a validated outcomes query.
///
/// # Arguments
/// * `query` - Raw URL query string (`statsPeriod=...&field=...`)
/// * `organization_id` - Organization the request is scoped to
/// * `project_ids` - Projects the request is scoped to
/// * `allow_minute_resolution` - Whether sub-hour buckets are enabled
///
/// # Returns
/// Dict with conditions, aggregations, groupby, start, end, rollup and dataset.
/// Raises `InvalidField`, `InvalidQuery` or `InvalidParams`.
#[pyfunction]
#[pyo3(signature = (query, organization_id=None, project_ids=Vec::new(), allow_minute_resolution=false))]
fn build_outcomes_query(
    py: Python<'_>,
    query: &str,
    organization_id: Option<u64>,
    project_ids: Vec<u64>,
    allow_minute_resolution: bool,
) -> PyResult<Py<PyAny>> {
    init_logger();

    let definition = build_definition(query, organization_id, project_ids, allow_minute_resolution)?;

    let conditions = PyList::empty(py);
    for condition in &definition.conditions {
        let values: PyObject = match &condition.values {
            ConditionValues::Categories(c) => c
                .iter()
                .map(DataCategory::code)
                .collect::<Vec<u8>>()
                .to_object(py),
            ConditionValues::Reasons(r) => r.to_object(py),
            ConditionValues::Outcomes(o) => o
                .iter()
                .map(Outcome::code)
                .collect::<Vec<u8>>()
                .to_object(py),
        };
        conditions.append((condition.dimension.as_str(), condition.operator.as_str(), values))?;
    }

    let aggregations = PyList::empty(py);
    for aggregation in &definition.aggregations {
        aggregations.append(aggregation.as_tuple())?;
    }

    let py_result = PyDict::new(py);
    py_result.set_item("conditions", conditions)?;
    py_result.set_item("aggregations", aggregations)?;
    py_result.set_item("groupby", definition.query_groupby.clone())?;
    py_result.set_item("start", format_timestamp(&definition.start))?;
    py_result.set_item("end", format_timestamp(&definition.end))?;
    py_result.set_item("rollup", definition.rollup)?;
    py_result.set_item("dataset", definition.dataset.as_str())?;

    Ok(py_result.into())
}

/// Build the datastore request body for an outcomes query, as JSON.
#[pyfunction]
#[pyo3(signature = (query, organization_id=None, project_ids=Vec::new(), allow_minute_resolution=false))]
fn build_outcomes_request(
    query: &str,
    organization_id: Option<u64>,
    project_ids: Vec<u64>,
    allow_minute_resolution: bool,
) -> PyResult<String> {
    init_logger();

    let definition = build_definition(query, organization_id, project_ids, allow_minute_resolution)?;
    Ok(build_request_json(&definition))
}

/// Accepted tokens per query parameter.
#[pyfunction]
fn get_query_vocabulary(py: Python<'_>) -> PyResult<Py<PyAny>> {
    let vocabulary = PyDict::new(py);
    vocabulary.set_item(
        "field",
        Field::ALL.iter().map(Field::as_str).collect::<Vec<_>>(),
    )?;
    vocabulary.set_item(
        "groupBy",
        GroupBy::ALL.iter().map(GroupBy::as_str).collect::<Vec<_>>(),
    )?;
    vocabulary.set_item(
        "category",
        CategoryToken::ALL.iter().map(CategoryToken::as_str).collect::<Vec<_>>(),
    )?;
    vocabulary.set_item(
        "reason",
        ReasonToken::ALL.iter().map(ReasonToken::as_str).collect::<Vec<_>>(),
    )?;
    vocabulary.set_item(
        "outcome",
        Outcome::ALL.iter().map(Outcome::as_str).collect::<Vec<_>>(),
    )?;
    Ok(vocabulary.into())
}

/// Python module definition
#[pymodule]
fn outcomes_core(py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add("InvalidField", py.get_type::<InvalidField>())?;
    m.add("InvalidQuery", py.get_type::<InvalidQuery>())?;
    m.add("InvalidParams", py.get_type::<InvalidParams>())?;
    m.add_function(wrap_pyfunction!(build_outcomes_query, m)?)?;
    m.add_function(wrap_pyfunction!(build_outcomes_request, m)?)?;
    m.add_function(wrap_pyfunction!(get_query_vocabulary, m)?)?;
    Ok(())
}
