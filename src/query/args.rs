//! Caller-side query arguments
//!
//! [`QueryArgs`] is an insertion-ordered list of named arguments, the Rust
//! rendition of the keyword-style call surface: one setter per known
//! component plus a generic [`set`](QueryArgs::set) for anything else.
//! Nothing is checked here; the query builder validates names against the
//! query type's schema when a factory is invoked.

use serde_json::Value;

use crate::components::{Aggregator, Filter, Having, PostAggregation};

/// A single named argument in caller form
#[derive(Debug, Clone)]
pub enum QueryArg {
    /// Plain JSON value, forwarded (possibly renamed) into the request
    /// document
    Value(Value),
    /// Filter spec, lowered through the filter builder
    Filter(Filter),
    /// Aggregator specs, lowered through the aggregator builder
    Aggregations(Vec<Aggregator>),
    /// Having spec, lowered through the having builder
    Having(Having),
    /// Post-aggregation specs, lowered through the post-aggregator builder
    PostAggregations(Vec<PostAggregation>),
}

/// Named query arguments, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct QueryArgs {
    parts: Vec<(String, QueryArg)>,
}

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary component by name. The name is validated against the
    /// query type's schema when the query is built.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parts.push((name.into(), QueryArg::Value(value.into())));
        self
    }

    /// The data source to query
    pub fn datasource(self, value: impl Into<Value>) -> Self {
        self.set("datasource", value)
    }

    /// Bucketing granularity (e.g. `"all"`, `"hour"`, or a granularity
    /// object)
    pub fn granularity(self, value: impl Into<Value>) -> Self {
        self.set("granularity", value)
    }

    /// ISO-8601 interval(s) to cover
    pub fn intervals(self, value: impl Into<Value>) -> Self {
        self.set("intervals", value)
    }

    /// The single dimension of a topN query
    pub fn dimension(self, value: impl Into<Value>) -> Self {
        self.set("dimension", value)
    }

    /// The dimensions of a groupBy or select query
    pub fn dimensions(self, value: impl Into<Value>) -> Self {
        self.set("dimensions", value)
    }

    /// The metric a topN query ranks by
    pub fn metric(self, value: impl Into<Value>) -> Self {
        self.set("metric", value)
    }

    /// The metrics returned by a select query
    pub fn metrics(self, value: impl Into<Value>) -> Self {
        self.set("metrics", value)
    }

    /// Maximum number of ranked values a topN query returns
    pub fn threshold(self, value: impl Into<Value>) -> Self {
        self.set("threshold", value)
    }

    /// Pagination spec for a select query
    pub fn paging_spec(self, value: impl Into<Value>) -> Self {
        self.set("paging_spec", value)
    }

    /// Ordering/limit spec for a groupBy query
    pub fn limit_spec(self, value: impl Into<Value>) -> Self {
        self.set("limit_spec", value)
    }

    /// Engine runtime options (timeout, priority, ...), forwarded opaquely
    pub fn context(self, value: impl Into<Value>) -> Self {
        self.set("context", value)
    }

    /// Row filter
    pub fn filter(mut self, filter: Filter) -> Self {
        self.parts.push(("filter".to_owned(), QueryArg::Filter(filter)));
        self
    }

    /// Aggregators to compute
    pub fn aggregations(mut self, aggregators: Vec<Aggregator>) -> Self {
        self.parts
            .push(("aggregations".to_owned(), QueryArg::Aggregations(aggregators)));
        self
    }

    /// Having condition over aggregated rows
    pub fn having(mut self, having: Having) -> Self {
        self.parts.push(("having".to_owned(), QueryArg::Having(having)));
        self
    }

    /// Post-aggregations over aggregator outputs
    pub fn post_aggregations(mut self, post_aggregations: Vec<PostAggregation>) -> Self {
        self.parts.push((
            "post_aggregations".to_owned(),
            QueryArg::PostAggregations(post_aggregations),
        ));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &(String, QueryArg)> {
        self.parts.iter()
    }

    pub(crate) fn into_parts(self) -> Vec<(String, QueryArg)> {
        self.parts
    }
}
