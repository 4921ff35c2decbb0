//! Filter specifications
//!
//! Row filters applied by the engine while scanning segments. A [`Filter`]
//! tree is lowered to its JSON wire fragment by [`build_filter`].

use serde_json::{json, Value};

use crate::error::{DruidError, DruidResult};

/// A filter specification
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact match on a dimension value
    Selector { dimension: String, value: Value },
    /// Java regular expression match on a dimension value
    Regex { dimension: String, pattern: String },
    /// JavaScript predicate over a dimension value
    Javascript { dimension: String, function: String },
    /// All sub-filters must match
    And(Vec<Filter>),
    /// At least one sub-filter must match
    Or(Vec<Filter>),
    /// Inverts the wrapped filter
    Not(Box<Filter>),
}

impl Filter {
    /// Exact-match filter on a dimension
    pub fn selector(dimension: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Selector {
            dimension: dimension.into(),
            value: value.into(),
        }
    }

    /// Regular-expression filter on a dimension
    pub fn regex(dimension: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Regex {
            dimension: dimension.into(),
            pattern: pattern.into(),
        }
    }

    /// JavaScript predicate filter on a dimension
    pub fn javascript(dimension: impl Into<String>, function: impl Into<String>) -> Self {
        Self::Javascript {
            dimension: dimension.into(),
            function: function.into(),
        }
    }

    /// Conjunction of filters
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    /// Disjunction of filters
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Or(filters)
    }

    /// Negation of a filter
    pub fn not(filter: Filter) -> Self {
        Self::Not(Box::new(filter))
    }
}

/// Comparison sugar for building selector filters
///
/// ```
/// use druid_client::components::{Dimension, Filter};
///
/// let filter = Dimension::new("user_lang").eq("en");
/// assert_eq!(filter, Filter::selector("user_lang", "en"));
/// ```
#[derive(Debug, Clone)]
pub struct Dimension(String);

impl Dimension {
    /// Name a dimension to compare against
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `dimension == value`
    pub fn eq(self, value: impl Into<Value>) -> Filter {
        Filter::Selector {
            dimension: self.0,
            value: value.into(),
        }
    }

    /// `dimension != value`
    pub fn ne(self, value: impl Into<Value>) -> Filter {
        Filter::not(self.eq(value))
    }
}

/// Lower a filter spec to its JSON wire fragment
pub fn build_filter(filter: &Filter) -> DruidResult<Value> {
    match filter {
        Filter::Selector { dimension, value } => Ok(json!({
            "type": "selector",
            "dimension": dimension,
            "value": value,
        })),
        Filter::Regex { dimension, pattern } => Ok(json!({
            "type": "regex",
            "dimension": dimension,
            "pattern": pattern,
        })),
        Filter::Javascript {
            dimension,
            function,
        } => Ok(json!({
            "type": "javascript",
            "dimension": dimension,
            "function": function,
        })),
        Filter::And(fields) => combine("and", fields),
        Filter::Or(fields) => combine("or", fields),
        Filter::Not(field) => Ok(json!({
            "type": "not",
            "field": build_filter(field)?,
        })),
    }
}

fn combine(kind: &'static str, fields: &[Filter]) -> DruidResult<Value> {
    if fields.is_empty() {
        return Err(DruidError::Spec {
            component: "filter",
            message: format!("{kind} filter requires at least one operand"),
        });
    }
    let fields = fields
        .iter()
        .map(build_filter)
        .collect::<DruidResult<Vec<_>>>()?;
    Ok(json!({ "type": kind, "fields": fields }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_fragment() {
        let fragment = build_filter(&Dimension::new("user_lang").eq("en")).unwrap();
        assert_eq!(
            fragment,
            json!({"type": "selector", "dimension": "user_lang", "value": "en"})
        );
    }

    #[test]
    fn test_nested_boolean_fragment() {
        let filter = Filter::and(vec![
            Filter::selector("country", "AU"),
            Filter::not(Filter::regex("user_name", "^bot_.*")),
        ]);
        let fragment = build_filter(&filter).unwrap();
        assert_eq!(fragment["type"], "and");
        assert_eq!(fragment["fields"][0]["dimension"], "country");
        assert_eq!(fragment["fields"][1]["type"], "not");
        assert_eq!(fragment["fields"][1]["field"]["pattern"], "^bot_.*");
    }

    #[test]
    fn test_empty_conjunction_is_rejected() {
        let err = build_filter(&Filter::and(vec![])).unwrap_err();
        assert!(matches!(
            err,
            DruidError::Spec {
                component: "filter",
                ..
            }
        ));
    }
}
