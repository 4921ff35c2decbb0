//! Aggregator specifications
//!
//! Named aggregators computed by the engine per result bucket. Constructors
//! mirror the engine's aggregator vocabulary; [`build_aggregators`] lowers a
//! list of them into the `aggregations` array of the request document.

use serde_json::{json, Value};

use crate::error::{DruidError, DruidResult};

/// A named aggregator specification
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    /// Output column name
    pub name: String,
    kind: AggregatorKind,
}

#[derive(Debug, Clone, PartialEq)]
enum AggregatorKind {
    Count,
    LongSum { field_name: String },
    DoubleSum { field_name: String },
    Min { field_name: String },
    Max { field_name: String },
    HyperUnique { field_name: String },
    Javascript {
        field_names: Vec<String>,
        fn_aggregate: String,
        fn_combine: String,
        fn_reset: String,
    },
}

fn named(name: impl Into<String>, kind: AggregatorKind) -> Aggregator {
    Aggregator {
        name: name.into(),
        kind,
    }
}

/// Row count
pub fn count(name: impl Into<String>) -> Aggregator {
    named(name, AggregatorKind::Count)
}

/// 64-bit integer sum of a column
pub fn longsum(name: impl Into<String>, field_name: impl Into<String>) -> Aggregator {
    named(
        name,
        AggregatorKind::LongSum {
            field_name: field_name.into(),
        },
    )
}

/// Floating-point sum of a column
pub fn doublesum(name: impl Into<String>, field_name: impl Into<String>) -> Aggregator {
    named(
        name,
        AggregatorKind::DoubleSum {
            field_name: field_name.into(),
        },
    )
}

/// Minimum value of a column
pub fn min(name: impl Into<String>, field_name: impl Into<String>) -> Aggregator {
    named(
        name,
        AggregatorKind::Min {
            field_name: field_name.into(),
        },
    )
}

/// Maximum value of a column
pub fn max(name: impl Into<String>, field_name: impl Into<String>) -> Aggregator {
    named(
        name,
        AggregatorKind::Max {
            field_name: field_name.into(),
        },
    )
}

/// Approximate cardinality of a hyperUnique-ingested column
pub fn hyperunique(name: impl Into<String>, field_name: impl Into<String>) -> Aggregator {
    named(
        name,
        AggregatorKind::HyperUnique {
            field_name: field_name.into(),
        },
    )
}

/// Custom JavaScript aggregator over one or more columns
pub fn javascript(
    name: impl Into<String>,
    field_names: Vec<String>,
    fn_aggregate: impl Into<String>,
    fn_combine: impl Into<String>,
    fn_reset: impl Into<String>,
) -> Aggregator {
    named(
        name,
        AggregatorKind::Javascript {
            field_names,
            fn_aggregate: fn_aggregate.into(),
            fn_combine: fn_combine.into(),
            fn_reset: fn_reset.into(),
        },
    )
}

/// Lower a list of aggregators into the `aggregations` wire fragment
pub fn build_aggregators(aggregators: &[Aggregator]) -> DruidResult<Value> {
    aggregators
        .iter()
        .map(build_aggregator)
        .collect::<DruidResult<Vec<_>>>()
        .map(Value::Array)
}

fn build_aggregator(aggregator: &Aggregator) -> DruidResult<Value> {
    if aggregator.name.is_empty() {
        return Err(DruidError::Spec {
            component: "aggregation",
            message: "aggregator name must not be empty".to_string(),
        });
    }

    let name = &aggregator.name;
    Ok(match &aggregator.kind {
        AggregatorKind::Count => json!({"type": "count", "name": name}),
        AggregatorKind::LongSum { field_name } => {
            json!({"type": "longSum", "name": name, "fieldName": field_name})
        }
        AggregatorKind::DoubleSum { field_name } => {
            json!({"type": "doubleSum", "name": name, "fieldName": field_name})
        }
        AggregatorKind::Min { field_name } => {
            json!({"type": "min", "name": name, "fieldName": field_name})
        }
        AggregatorKind::Max { field_name } => {
            json!({"type": "max", "name": name, "fieldName": field_name})
        }
        AggregatorKind::HyperUnique { field_name } => {
            json!({"type": "hyperUnique", "name": name, "fieldName": field_name})
        }
        AggregatorKind::Javascript {
            field_names,
            fn_aggregate,
            fn_combine,
            fn_reset,
        } => json!({
            "type": "javascript",
            "name": name,
            "fieldNames": field_names,
            "fnAggregate": fn_aggregate,
            "fnCombine": fn_combine,
            "fnReset": fn_reset,
        }),
    })
}
