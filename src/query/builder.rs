//! Query construction
//!
//! Validates caller arguments against per-query-type schemas and assembles
//! the canonical request document. One factory per query type; each binds
//! the type's schema and delegates to the shared validate + assemble steps,
//! so both transports execute identically-built queries.

use serde_json::{Map, Value};

use crate::components::{build_aggregators, build_filter, build_having, build_post_aggregators};
use crate::error::{DruidError, DruidResult};

use super::args::{QueryArg, QueryArgs};
use super::types::{Query, QueryType};

/// Builds validated, unexecuted queries from caller arguments
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryBuilder;

impl QueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Check every supplied argument name against the query type's schema.
    ///
    /// `context` is allowed for every query type: it carries engine runtime
    /// options (timeout, priority) and is forwarded opaquely. Validation is
    /// fully pre-flight; nothing is assembled before it passes.
    fn validate(query_type: QueryType, args: &QueryArgs) -> DruidResult<()> {
        let valid = query_type.valid_components();
        for (name, _) in args.iter() {
            if name != "context" && !valid.contains(&name.as_str()) {
                let mut listed = valid.to_vec();
                listed.push("context");
                return Err(DruidError::InvalidArgument {
                    component: name.clone(),
                    query_type,
                    valid: listed,
                });
            }
        }
        Ok(())
    }

    /// Assemble the canonical request document from validated arguments.
    ///
    /// Component specs are lowered through their builders; any failure there
    /// is fatal and propagated verbatim. Plain values pass through under
    /// their canonical names.
    fn assemble(query_type: QueryType, args: QueryArgs) -> DruidResult<Query> {
        let mut document = Map::new();
        document.insert(
            "queryType".to_owned(),
            Value::String(query_type.as_str().to_owned()),
        );

        for (name, arg) in args.into_parts() {
            document.insert(canonical_name(&name), lower(arg)?);
        }

        Ok(Query::new(document, query_type))
    }

    fn build(query_type: QueryType, args: QueryArgs) -> DruidResult<Query> {
        Self::validate(query_type, &args)?;
        Self::assemble(query_type, args)
    }

    /// A topN query returns the top values of one dimension, ranked by a
    /// metric. Conceptually an approximate groupBy over a single dimension
    /// with an ordering; cheaper than groupBy for that shape.
    pub fn topn(&self, args: QueryArgs) -> DruidResult<Query> {
        Self::build(QueryType::TopN, args)
    }

    /// A timeseries query returns the requested aggregates per timestamp
    /// bucket.
    pub fn timeseries(&self, args: QueryArgs) -> DruidResult<Query> {
        Self::build(QueryType::Timeseries, args)
    }

    /// A groupBy query groups aggregated rows by one or more dimensions.
    pub fn groupby(&self, args: QueryArgs) -> DruidResult<Query> {
        Self::build(QueryType::GroupBy, args)
    }

    /// A segmentMetadata query reports per-segment structure: column types
    /// and sizes, covered interval, segment id.
    pub fn segment_metadata(&self, args: QueryArgs) -> DruidResult<Query> {
        Self::build(QueryType::SegmentMetadata, args)
    }

    /// A timeBoundary query returns the earliest and latest timestamps in a
    /// data source.
    pub fn time_boundary(&self, args: QueryArgs) -> DruidResult<Query> {
        Self::build(QueryType::TimeBoundary, args)
    }

    /// A select query returns raw rows and supports pagination.
    pub fn select(&self, args: QueryArgs) -> DruidResult<Query> {
        Self::build(QueryType::Select, args)
    }
}

/// Caller name → canonical request-document name
fn canonical_name(name: &str) -> String {
    match name {
        "datasource" => "dataSource",
        "paging_spec" => "pagingSpec",
        "limit_spec" => "limitSpec",
        "post_aggregations" => "postAggregations",
        other => other,
    }
    .to_owned()
}

/// Lower an argument to its request-document value
fn lower(arg: QueryArg) -> DruidResult<Value> {
    match arg {
        QueryArg::Value(value) => Ok(value),
        QueryArg::Filter(filter) => build_filter(&filter),
        QueryArg::Aggregations(aggregators) => build_aggregators(&aggregators),
        QueryArg::Having(having) => build_having(&having),
        QueryArg::PostAggregations(post_aggregations) => {
            build_post_aggregators(&post_aggregations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{aggregation, Dimension, Filter, Having, PostAggregation};
    use serde_json::json;

    fn full_args(query_type: QueryType) -> QueryArgs {
        // one representative value per schema key
        query_type
            .valid_components()
            .iter()
            .fold(QueryArgs::new(), |args, name| args.set(*name, "x"))
            .context(json!({"timeout": 1000}))
    }

    #[test]
    fn test_full_schema_validates_for_every_query_type() {
        let builder = QueryBuilder::new();
        let cases: &[(QueryType, fn(&QueryBuilder, QueryArgs) -> DruidResult<Query>)] = &[
            (QueryType::TopN, QueryBuilder::topn as _),
            (QueryType::Timeseries, QueryBuilder::timeseries as _),
            (QueryType::GroupBy, QueryBuilder::groupby as _),
            (QueryType::SegmentMetadata, QueryBuilder::segment_metadata as _),
            (QueryType::TimeBoundary, QueryBuilder::time_boundary as _),
            (QueryType::Select, QueryBuilder::select as _),
        ];

        for (query_type, factory) in cases {
            let query = factory(&builder, full_args(*query_type)).unwrap();
            assert_eq!(query.query_type(), *query_type);
            assert_eq!(query.request()["queryType"], query_type.as_str());
        }
    }

    #[test]
    fn test_unknown_component_is_rejected_with_details() {
        let err = QueryBuilder::new()
            .timeseries(
                QueryArgs::new()
                    .datasource("events")
                    .set("threshold", 5),
            )
            .unwrap_err();

        match err {
            DruidError::InvalidArgument {
                component,
                query_type,
                valid,
            } => {
                assert_eq!(component, "threshold");
                assert_eq!(query_type, QueryType::Timeseries);
                assert!(valid.contains(&"datasource"));
                assert!(valid.contains(&"context"));
                assert!(!valid.contains(&"threshold"));
            }
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_context_is_always_allowed() {
        let query = QueryBuilder::new()
            .time_boundary(
                QueryArgs::new()
                    .datasource("events")
                    .context(json!({"priority": 10})),
            )
            .unwrap();
        assert_eq!(query.request()["context"]["priority"], 10);
    }

    #[test]
    fn test_snake_case_names_are_canonicalized() {
        let query = QueryBuilder::new()
            .select(
                QueryArgs::new()
                    .datasource("events")
                    .granularity("all")
                    .intervals("2015-12-29/pt1h")
                    .paging_spec(json!({"pagingIdentifiers": {}, "threshold": 100})),
            )
            .unwrap();

        let request = query.request();
        assert_eq!(request["dataSource"], "events");
        assert!(request.contains_key("pagingSpec"));
        assert!(!request.contains_key("datasource"));
        assert!(!request.contains_key("paging_spec"));

        let query = QueryBuilder::new()
            .groupby(
                QueryArgs::new()
                    .datasource("events")
                    .dimensions(json!(["country"]))
                    .limit_spec(json!({"type": "default", "limit": 10})),
            )
            .unwrap();
        assert!(query.request().contains_key("limitSpec"));
        assert!(!query.request().contains_key("limit_spec"));
    }

    #[test]
    fn test_component_specs_are_lowered() {
        let query = QueryBuilder::new()
            .groupby(
                QueryArgs::new()
                    .datasource("events")
                    .granularity("all")
                    .intervals("2015-12-29/pt1h")
                    .dimensions(json!(["country"]))
                    .filter(Dimension::new("user_lang").eq("en"))
                    .aggregations(vec![aggregation::doublesum("count", "count")])
                    .having(Having::greater_than("count", 1.0))
                    .post_aggregations(vec![PostAggregation::arithmetic(
                        "ratio",
                        "/",
                        vec![
                            PostAggregation::field_access("count"),
                            PostAggregation::constant(100.0),
                        ],
                    )]),
            )
            .unwrap();

        let request = query.request();
        assert_eq!(request["filter"]["type"], "selector");
        assert_eq!(request["aggregations"][0]["type"], "doubleSum");
        assert_eq!(request["having"]["type"], "greaterThan");
        assert_eq!(request["postAggregations"][0]["name"], "ratio");
        assert!(!request.contains_key("post_aggregations"));
    }

    #[test]
    fn test_component_build_failure_propagates() {
        let err = QueryBuilder::new()
            .timeseries(
                QueryArgs::new()
                    .datasource("events")
                    .filter(Filter::and(vec![])),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DruidError::Spec {
                component: "filter",
                ..
            }
        ));
    }

    #[test]
    fn test_document_serializes_in_argument_order() {
        let query = QueryBuilder::new()
            .timeseries(
                QueryArgs::new()
                    .datasource("events")
                    .granularity("all")
                    .intervals("2015-12-29/pt1h"),
            )
            .unwrap();

        let names: Vec<&str> = query.request().keys().map(String::as_str).collect();
        assert_eq!(names, ["queryType", "dataSource", "granularity", "intervals"]);
    }
}
