//! Query types and the round-trip container

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{DruidError, DruidResult};

/// The closed set of query types understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    TopN,
    Timeseries,
    GroupBy,
    SegmentMetadata,
    TimeBoundary,
    Select,
}

impl QueryType {
    /// Wire name carried in the request document's `queryType` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopN => "topN",
            Self::Timeseries => "timeseries",
            Self::GroupBy => "groupBy",
            Self::SegmentMetadata => "segmentMetadata",
            Self::TimeBoundary => "timeBoundary",
            Self::Select => "select",
        }
    }

    /// Argument names allowed for this query type. `context` is implicitly
    /// allowed everywhere and is not listed here.
    pub(crate) fn valid_components(&self) -> &'static [&'static str] {
        match self {
            Self::TopN => &[
                "datasource",
                "granularity",
                "filter",
                "aggregations",
                "post_aggregations",
                "intervals",
                "dimension",
                "threshold",
                "metric",
            ],
            Self::Timeseries => &[
                "datasource",
                "granularity",
                "filter",
                "aggregations",
                "post_aggregations",
                "intervals",
            ],
            Self::GroupBy => &[
                "datasource",
                "granularity",
                "filter",
                "aggregations",
                "having",
                "post_aggregations",
                "intervals",
                "dimensions",
                "limit_spec",
            ],
            Self::SegmentMetadata => &["datasource", "intervals"],
            Self::TimeBoundary => &["datasource"],
            Self::Select => &[
                "datasource",
                "granularity",
                "filter",
                "dimensions",
                "metrics",
                "paging_spec",
                "intervals",
            ],
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One query round trip: the canonical request document and, once a
/// transport has executed it, the parsed response
///
/// The request document is immutable after construction. `result` and
/// `result_raw` start out absent and are written exactly once, by the
/// transport, on successful execution; a failed execution yields an error
/// instead of a `Query`.
#[derive(Debug, Clone)]
pub struct Query {
    request: Map<String, Value>,
    query_type: QueryType,
    result: Option<Value>,
    result_raw: Option<String>,
}

impl Query {
    pub(crate) fn new(request: Map<String, Value>, query_type: QueryType) -> Self {
        Self {
            request,
            query_type,
            result: None,
            result_raw: None,
        }
    }

    /// The type this query was built as
    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    /// The canonical request document sent to the engine
    pub fn request(&self) -> &Map<String, Value> {
        &self.request
    }

    /// The request document serialized to JSON
    pub fn request_json(&self) -> DruidResult<String> {
        Ok(serde_json::to_string(&self.request)?)
    }

    /// Parsed response payload; `None` until the query has been executed
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Original response text; `None` until the query has been executed
    pub fn result_raw(&self) -> Option<&str> {
        self.result_raw.as_deref()
    }

    /// Store a successful response body, keeping both the raw text and the
    /// parsed value
    pub(crate) fn parse(&mut self, body: &str) -> DruidResult<()> {
        let parsed: Value = serde_json::from_str(body).map_err(|e| {
            DruidError::ResponseShape(format!("response body is not valid JSON: {e}"))
        })?;
        self.result = Some(parsed);
        self.result_raw = Some(body.to_owned());
        Ok(())
    }
}
