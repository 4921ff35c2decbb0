//! Error types
//!
//! Defines the single domain error surfaced by every part of the client:
//! argument validation, component construction, transport dispatch, and
//! tabular export.

use thiserror::Error;

use crate::query::QueryType;

/// Result type for all client operations
pub type DruidResult<T> = Result<T, DruidError>;

/// What went wrong at the HTTP layer
#[derive(Debug)]
pub enum HttpFailure {
    /// The server answered with a non-success status code
    Status(reqwest::StatusCode),
    /// The request never completed (connection failure, timeout, body read)
    Request(reqwest::Error),
}

impl std::fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP status {}", status),
            Self::Request(err) => write!(f, "{}", err),
        }
    }
}

/// Errors that can occur while building, dispatching, or exporting queries
#[derive(Error, Debug)]
pub enum DruidError {
    /// An argument name outside the query type's schema was supplied.
    /// Raised before any network I/O.
    #[error(
        "query component {component:?} is not valid for query type {query_type}; \
         valid components are: {valid:?}"
    )]
    InvalidArgument {
        component: String,
        query_type: QueryType,
        valid: Vec<&'static str>,
    },

    /// A filter, aggregation, having, or post-aggregation spec could not be
    /// lowered to its wire fragment
    #[error("invalid {component} specification: {message}")]
    Spec {
        component: &'static str,
        message: String,
    },

    /// The HTTP call failed or the engine returned a non-success status.
    /// Carries the engine's own error report when one could be extracted,
    /// and the serialized request document for diagnosis.
    #[error("druid query failed: {failure}; druid error: {engine_error:?}; query was: {request}")]
    Transport {
        failure: HttpFailure,
        engine_error: Option<String>,
        request: String,
    },

    /// Tabular export requested for a query type without a tabular shape
    #[error("tabular export is not supported for query type {0}")]
    UnsupportedExport(QueryType),

    /// A successful response could not be interpreted
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error during export
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error during export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
