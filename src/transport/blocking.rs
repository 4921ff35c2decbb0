//! Thread-blocking transport

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::DruidResult;
use crate::query::Query;

/// Thread-blocking HTTP transport
///
/// `execute` occupies the calling thread until the response (or failure)
/// arrives. Safe to use from multiple threads concurrently: the transport
/// holds no mutable state and every query owns its own document and result
/// slot.
#[derive(Debug, Clone)]
pub struct BlockingHttpTransport {
    client: reqwest::blocking::Client,
}

impl BlockingHttpTransport {
    /// Create a transport with the given connection-level timeout
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// POST the query's request document to `url` and store the parsed
    /// response into the query
    pub fn execute(&self, query: &mut Query, url: &str) -> DruidResult<()> {
        let body = super::request_body(query)?;
        tracing::debug!(query_type = %query.query_type(), %url, "posting druid query");

        let response = match self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
        {
            Ok(response) => response,
            Err(e) => return Err(super::request_failure(query, e)),
        };

        let status = response.status();
        let text = match response.text() {
            Ok(text) => text,
            Err(e) => return Err(super::request_failure(query, e)),
        };

        if status.is_success() {
            query.parse(&text)
        } else {
            Err(super::status_failure(query, status, &text))
        }
    }
}
