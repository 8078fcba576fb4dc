//! End-to-end checks of outcomes query construction through the public API.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use outcomes_core::vocabulary::{CategoryToken, ReasonToken};
use outcomes_core::{
    Aggregation, Condition, DataCategory, Outcome, QueryContext, QueryDefinition, QueryError,
    RawQuery,
};

fn make_query(qs: &str, allow_minute_resolution: bool) -> Result<QueryDefinition, QueryError> {
    let ctx = QueryContext::default().with_now(Utc.with_ymd_and_hms(2026, 3, 10, 12, 34, 56).unwrap());
    QueryDefinition::build(&RawQuery::parse(qs), &ctx, allow_minute_resolution)
}

fn is_invalid_field(result: Result<QueryDefinition, QueryError>) -> bool {
    matches!(result, Err(QueryError::InvalidField(_)))
}

fn is_invalid_query(result: Result<QueryDefinition, QueryError>) -> bool {
    matches!(result, Err(QueryError::InvalidQuery(_)))
}

#[test]
fn test_query_must_have_category() {
    assert!(is_invalid_query(make_query(
        "statsPeriod=4d&interval=1d&field=sum(quantity)",
        true
    )));
    assert!(is_invalid_query(make_query("field=sum(quantity)", true)));
}

#[test]
fn test_invalid_field() {
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&interval=1d&field=sum(badstuff)",
        true
    )));
}

#[test]
fn test_empty_query() {
    assert!(is_invalid_field(make_query("", true)));
}

#[test]
fn test_invalid_groupby() {
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&interval=1d&field=sum(quantity)&groupBy=category&groupBy=no",
        true
    )));
}

#[test]
fn test_invalid_category() {
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&category=zzz&interval=1d&groupBy=category&groupBy=no",
        true
    )));
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&category=zzz&interval=1d&field=sum(quantity)",
        true
    )));
}

#[test]
fn test_invalid_reason() {
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&reason=zzz&interval=1d&groupBy=category&groupBy=no",
        true
    )));
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&reason=zzz&interval=1d&groupBy=category&field=sum(quantity)",
        true
    )));
}

#[test]
fn test_invalid_outcome() {
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&outcome=zzz&interval=1d&groupBy=category&groupBy=no",
        true
    )));
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&outcome=zzz&interval=1d&groupBy=category&field=sum(quantity)",
        true
    )));
}

#[test]
fn test_no_field() {
    assert!(is_invalid_field(make_query(
        "statsPeriod=4d&interval=1d&groupBy=category&groupBy=no",
        true
    )));
}

#[test]
fn test_no_combined_attachment() {
    assert!(is_invalid_query(make_query(
        "statsPeriod=4d&interval=1d&category=error&category=attachment&field=sum(quantity)",
        true
    )));
}

#[test]
fn test_correct_category_mapping() {
    let query = make_query(
        "statsPeriod=4d&interval=1d&category=error&field=sum(quantity)",
        true,
    )
    .unwrap();

    assert_eq!(
        query.conditions,
        vec![Condition::category(vec![
            DataCategory::Default,
            DataCategory::Error,
            DataCategory::Security,
        ])]
    );
}

#[test]
fn test_correct_reason_mapping() {
    let query = make_query(
        "statsPeriod=4d&interval=1d&groupBy=category&reason=spike_protection&field=sum(quantity)",
        true,
    )
    .unwrap();

    assert_eq!(
        query.conditions,
        vec![Condition::reason(vec!["smart_rate_limit"])]
    );
}

#[test]
fn test_correct_outcome_mapping() {
    let query = make_query(
        "statsPeriod=4d&interval=1d&groupBy=category&outcome=accepted&field=sum(quantity)",
        true,
    )
    .unwrap();

    assert_eq!(
        query.conditions,
        vec![Condition::outcome(vec![Outcome::Accepted])]
    );
}

#[test]
fn test_correct_times_seen_aggregate() {
    let query = make_query(
        "statsPeriod=6h&interval=10m&groupBy=category&field=sum(times_seen)",
        true,
    )
    .unwrap();
    assert_eq!(
        query.aggregations,
        vec![Aggregation::new("count()", "", "times_seen")]
    );

    let query = make_query(
        "statsPeriod=6h&interval=1d&groupBy=category&field=sum(times_seen)",
        true,
    )
    .unwrap();
    assert_eq!(
        query.aggregations,
        vec![Aggregation::new("sum", "times_seen", "times_seen")]
    );
}

#[test]
fn test_times_seen_summed_without_minute_resolution() {
    let query = make_query(
        "statsPeriod=6h&interval=10m&groupBy=category&field=sum(times_seen)",
        false,
    )
    .unwrap();
    assert_eq!(
        query.aggregations,
        vec![Aggregation::new("sum", "times_seen", "times_seen")]
    );
}

#[test]
fn test_quantity_not_resolution_sensitive() {
    let query = make_query(
        "statsPeriod=6h&interval=10m&groupBy=category&field=sum(quantity)",
        true,
    )
    .unwrap();
    assert_eq!(
        query.aggregations,
        vec![Aggregation::new("sum", "quantity", "quantity")]
    );
}

#[test]
fn test_invalid_window_is_invalid_params() {
    assert!(matches!(
        make_query("statsPeriod=4d&interval=7h&groupBy=category&field=sum(quantity)", true),
        Err(QueryError::InvalidParams(_))
    ));
}

#[test]
fn test_descriptor_serializes() {
    let query = make_query(
        "statsPeriod=4d&interval=1d&category=error&field=sum(quantity)",
        true,
    )
    .unwrap();
    let value = serde_json::to_value(&query).unwrap();
    assert_eq!(value["conditions"][0]["values"], serde_json::json!([0, 1, 3]));
    assert_eq!(value["dataset"], serde_json::json!("outcomes"));
}

fn known_token(raw: &str) -> bool {
    CategoryToken::parse(raw).is_some()
        || ReasonToken::parse(raw).is_some()
        || Outcome::parse(raw).is_some()
}

proptest! {
    #[test]
    fn prop_unknown_filter_tokens_are_invalid_field(
        token in "[a-z_]{1,16}",
        dimension in prop::sample::select(vec!["category", "reason", "outcome"]),
    ) {
        prop_assume!(!known_token(&token));
        let qs = format!("statsPeriod=4d&interval=1d&field=sum(quantity)&groupBy=category&{}={}", dimension, token);
        prop_assert!(is_invalid_field(make_query(&qs, true)));
    }

    #[test]
    fn prop_unknown_groupby_is_invalid_field(token in "[a-z_]{1,16}") {
        prop_assume!(outcomes_core::GroupBy::parse(&token).is_none());
        let qs = format!("field=sum(quantity)&category=error&groupBy={}", token);
        prop_assert!(is_invalid_field(make_query(&qs, true)));
    }

    #[test]
    fn prop_build_is_idempotent(
        categories in prop::collection::vec(
            prop::sample::select(vec!["error", "default", "transaction", "security", "session"]),
            1..4,
        ),
        interval in prop::sample::select(vec!["10m", "30m", "1h", "6h", "1d"]),
        allow_minute_resolution in any::<bool>(),
    ) {
        let mut qs = format!("statsPeriod=6h&interval={}&field=sum(times_seen)", interval);
        for category in &categories {
            qs.push_str(&format!("&category={}", category));
        }
        let first = make_query(&qs, allow_minute_resolution).unwrap();
        let second = make_query(&qs, allow_minute_resolution).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.aggregations.len(), 1);
        prop_assert_eq!(first.conditions.len(), 1);
    }
}
