//! Post-aggregation specifications
//!
//! Arithmetic computed by the engine over aggregator outputs after the
//! aggregation pass. Lowered by [`build_post_aggregators`] into the
//! `postAggregations` array of the request document.

use serde_json::{json, Value};

use crate::error::{DruidError, DruidResult};

const ARITHMETIC_FUNCTIONS: &[&str] = &["+", "-", "*", "/", "quotient"];

/// A post-aggregation specification
#[derive(Debug, Clone, PartialEq)]
pub enum PostAggregation {
    /// Named arithmetic combination of other post-aggregations
    Arithmetic {
        name: String,
        function: String,
        fields: Vec<PostAggregation>,
    },
    /// References an aggregator output by name
    FieldAccess { field_name: String },
    /// A constant operand
    Constant { value: f64 },
    /// Cardinality of a hyperUnique aggregator output
    HyperUniqueCardinality { field_name: String },
}

impl PostAggregation {
    /// Arithmetic over the given operands; `function` is one of
    /// `+`, `-`, `*`, `/`, `quotient`
    pub fn arithmetic(
        name: impl Into<String>,
        function: impl Into<String>,
        fields: Vec<PostAggregation>,
    ) -> Self {
        Self::Arithmetic {
            name: name.into(),
            function: function.into(),
            fields,
        }
    }

    /// Operand referencing an aggregator output
    pub fn field_access(field_name: impl Into<String>) -> Self {
        Self::FieldAccess {
            field_name: field_name.into(),
        }
    }

    /// Constant operand
    pub fn constant(value: f64) -> Self {
        Self::Constant { value }
    }

    /// Operand reading the cardinality of a hyperUnique aggregator
    pub fn hyper_unique_cardinality(field_name: impl Into<String>) -> Self {
        Self::HyperUniqueCardinality {
            field_name: field_name.into(),
        }
    }
}

/// Lower a list of post-aggregations into the `postAggregations` fragment
pub fn build_post_aggregators(post_aggregations: &[PostAggregation]) -> DruidResult<Value> {
    post_aggregations
        .iter()
        .map(build_post_aggregator)
        .collect::<DruidResult<Vec<_>>>()
        .map(Value::Array)
}

fn build_post_aggregator(post_aggregation: &PostAggregation) -> DruidResult<Value> {
    match post_aggregation {
        PostAggregation::Arithmetic {
            name,
            function,
            fields,
        } => {
            if !ARITHMETIC_FUNCTIONS.contains(&function.as_str()) {
                return Err(DruidError::Spec {
                    component: "post-aggregation",
                    message: format!(
                        "unknown arithmetic function {function:?}; expected one of {ARITHMETIC_FUNCTIONS:?}"
                    ),
                });
            }
            if fields.len() < 2 {
                return Err(DruidError::Spec {
                    component: "post-aggregation",
                    message: format!("arithmetic post-aggregator {name:?} requires at least two operands"),
                });
            }
            let fields = fields
                .iter()
                .map(build_post_aggregator)
                .collect::<DruidResult<Vec<_>>>()?;
            Ok(json!({
                "type": "arithmetic",
                "name": name,
                "fn": function,
                "fields": fields,
            }))
        }
        PostAggregation::FieldAccess { field_name } => Ok(json!({
            "type": "fieldAccess",
            "fieldName": field_name,
        })),
        PostAggregation::Constant { value } => Ok(json!({
            "type": "constant",
            "value": value,
        })),
        PostAggregation::HyperUniqueCardinality { field_name } => Ok(json!({
            "type": "hyperUniqueCardinality",
            "fieldName": field_name,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_fragment() {
        let spec = PostAggregation::arithmetic(
            "avg_tweets",
            "/",
            vec![
                PostAggregation::field_access("tweet_count"),
                PostAggregation::field_access("user_count"),
            ],
        );
        let fragment = build_post_aggregators(&[spec]).unwrap();
        assert_eq!(
            fragment,
            json!([{
                "type": "arithmetic",
                "name": "avg_tweets",
                "fn": "/",
                "fields": [
                    {"type": "fieldAccess", "fieldName": "tweet_count"},
                    {"type": "fieldAccess", "fieldName": "user_count"},
                ],
            }])
        );
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let spec = PostAggregation::arithmetic(
            "bad",
            "%",
            vec![
                PostAggregation::field_access("a"),
                PostAggregation::constant(2.0),
            ],
        );
        let err = build_post_aggregators(&[spec]).unwrap_err();
        assert!(matches!(
            err,
            DruidError::Spec {
                component: "post-aggregation",
                ..
            }
        ));
    }

    #[test]
    fn test_single_operand_is_rejected() {
        let spec =
            PostAggregation::arithmetic("bad", "+", vec![PostAggregation::field_access("a")]);
        assert!(build_post_aggregators(&[spec]).is_err());
    }
}
