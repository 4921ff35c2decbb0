//! Having specifications
//!
//! Conditions evaluated against aggregated rows of a groupBy query, the
//! engine's analogue of SQL `HAVING`. Lowered by [`build_having`].

use serde_json::{json, Value};

use crate::error::{DruidError, DruidResult};

/// A having specification for groupBy queries
#[derive(Debug, Clone, PartialEq)]
pub enum Having {
    /// Aggregated value equals the given number
    EqualTo { aggregation: String, value: f64 },
    /// Aggregated value is strictly greater than the given number
    GreaterThan { aggregation: String, value: f64 },
    /// Aggregated value is strictly less than the given number
    LessThan { aggregation: String, value: f64 },
    /// All sub-conditions must hold
    And(Vec<Having>),
    /// At least one sub-condition must hold
    Or(Vec<Having>),
    /// Inverts the wrapped condition
    Not(Box<Having>),
}

impl Having {
    /// `aggregation == value`
    pub fn equal_to(aggregation: impl Into<String>, value: f64) -> Self {
        Self::EqualTo {
            aggregation: aggregation.into(),
            value,
        }
    }

    /// `aggregation > value`
    pub fn greater_than(aggregation: impl Into<String>, value: f64) -> Self {
        Self::GreaterThan {
            aggregation: aggregation.into(),
            value,
        }
    }

    /// `aggregation < value`
    pub fn less_than(aggregation: impl Into<String>, value: f64) -> Self {
        Self::LessThan {
            aggregation: aggregation.into(),
            value,
        }
    }

    /// Conjunction of conditions
    pub fn and(specs: Vec<Having>) -> Self {
        Self::And(specs)
    }

    /// Disjunction of conditions
    pub fn or(specs: Vec<Having>) -> Self {
        Self::Or(specs)
    }

    /// Negation of a condition
    pub fn not(spec: Having) -> Self {
        Self::Not(Box::new(spec))
    }
}

/// Lower a having spec to its JSON wire fragment
pub fn build_having(having: &Having) -> DruidResult<Value> {
    match having {
        Having::EqualTo { aggregation, value } => Ok(json!({
            "type": "equalTo",
            "aggregation": aggregation,
            "value": value,
        })),
        Having::GreaterThan { aggregation, value } => Ok(json!({
            "type": "greaterThan",
            "aggregation": aggregation,
            "value": value,
        })),
        Having::LessThan { aggregation, value } => Ok(json!({
            "type": "lessThan",
            "aggregation": aggregation,
            "value": value,
        })),
        Having::And(specs) => combine("and", specs),
        Having::Or(specs) => combine("or", specs),
        Having::Not(spec) => Ok(json!({
            "type": "not",
            "havingSpec": build_having(spec)?,
        })),
    }
}

fn combine(kind: &'static str, specs: &[Having]) -> DruidResult<Value> {
    if specs.is_empty() {
        return Err(DruidError::Spec {
            component: "having",
            message: format!("{kind} having requires at least one operand"),
        });
    }
    let specs = specs
        .iter()
        .map(build_having)
        .collect::<DruidResult<Vec<_>>>()?;
    Ok(json!({ "type": kind, "havingSpecs": specs }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_fragment() {
        let fragment = build_having(&Having::greater_than("count", 10.0)).unwrap();
        assert_eq!(
            fragment,
            json!({"type": "greaterThan", "aggregation": "count", "value": 10.0})
        );
    }

    #[test]
    fn test_boolean_fragment() {
        let having = Having::and(vec![
            Having::greater_than("count", 1.0),
            Having::not(Having::equal_to("uniques", 0.0)),
        ]);
        let fragment = build_having(&having).unwrap();
        assert_eq!(fragment["type"], "and");
        assert_eq!(fragment["havingSpecs"][1]["havingSpec"]["type"], "equalTo");
    }

    #[test]
    fn test_empty_disjunction_is_rejected() {
        let err = build_having(&Having::or(vec![])).unwrap_err();
        assert!(matches!(
            err,
            DruidError::Spec {
                component: "having",
                ..
            }
        ));
    }
}
