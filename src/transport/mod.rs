//! HTTP transport
//!
//! Two transport variants share one dispatch algorithm: serialize the
//! request document, POST it with `Content-Type: application/json`,
//! translate any HTTP-layer failure into the domain error, and parse the
//! response body into the owning [`Query`] on success.
//!
//! - [`HttpTransport`]: non-blocking; the future suspends at the fetch, so
//!   other tasks on the same runtime keep running during the wait
//! - [`BlockingHttpTransport`]: occupies the calling thread for the
//!   duration of the call
//!
//! The variants differ only in scheduling. Request serialization and error
//! translation live here, in shared helpers, so the choice of transport
//! never changes the bytes sent or the errors observed. Neither variant
//! retries; engine-side timeouts travel in the query's `context`.

mod blocking;
mod http;

pub use blocking::BlockingHttpTransport;
pub use http::HttpTransport;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{DruidError, DruidResult, HttpFailure};
use crate::query::Query;

/// Serialize the request document once, in one place, so both transports
/// send identical bytes for identical documents
pub(crate) fn request_body(query: &Query) -> DruidResult<String> {
    query.request_json()
}

/// Pretty-printed request document, embedded in transport errors so the
/// caller can always reconstruct what was sent
fn request_for_diagnosis(query: &Query) -> String {
    serde_json::to_string_pretty(query.request())
        .unwrap_or_else(|_| "<unserializable request>".to_owned())
}

/// Translate a non-success response into the domain error.
///
/// On HTTP 500 the body may carry the engine's own error report; extraction
/// is best-effort and a parse failure (or a missing `error` field) leaves
/// the message absent rather than raising a secondary error.
pub(crate) fn status_failure(query: &Query, status: StatusCode, body: &str) -> DruidError {
    let engine_error = if status == StatusCode::INTERNAL_SERVER_ERROR {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
    } else {
        None
    };

    if let Some(message) = &engine_error {
        tracing::warn!(query_type = %query.query_type(), %message, "druid reported a query error");
    }

    DruidError::Transport {
        failure: HttpFailure::Status(status),
        engine_error,
        request: request_for_diagnosis(query),
    }
}

/// Translate a connection-level failure into the domain error
pub(crate) fn request_failure(query: &Query, error: reqwest::Error) -> DruidError {
    DruidError::Transport {
        failure: HttpFailure::Request(error),
        engine_error: None,
        request: request_for_diagnosis(query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryArgs, QueryBuilder};

    fn sample_query() -> Query {
        QueryBuilder::new()
            .time_boundary(QueryArgs::new().datasource("events"))
            .unwrap()
    }

    #[test]
    fn test_engine_error_is_extracted_from_500_body() {
        let err = status_failure(
            &sample_query(),
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "boom", "host": "broker-1"}"#,
        );
        match err {
            DruidError::Transport {
                failure: HttpFailure::Status(status),
                engine_error,
                request,
            } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(engine_error.as_deref(), Some("boom"));
                assert!(request.contains("\"queryType\": \"timeBoundary\""));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_500_body_leaves_message_absent() {
        let err = status_failure(
            &sample_query(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Druid error",
        );
        assert!(matches!(
            err,
            DruidError::Transport {
                engine_error: None,
                ..
            }
        ));
    }

    #[test]
    fn test_non_500_bodies_are_not_inspected() {
        let err = status_failure(
            &sample_query(),
            StatusCode::BAD_REQUEST,
            r#"{"error": "boom"}"#,
        );
        assert!(matches!(
            err,
            DruidError::Transport {
                engine_error: None,
                ..
            }
        ));
    }

    #[test]
    fn test_request_body_is_deterministic() {
        let a = request_body(&sample_query()).unwrap();
        let b = request_body(&sample_query()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("\"queryType\":\"timeBoundary\""));
    }
}
