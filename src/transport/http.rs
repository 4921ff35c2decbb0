//! Non-blocking transport

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::DruidResult;
use crate::query::Query;

/// Non-blocking HTTP transport
///
/// The returned future suspends at the network boundary; on a
/// current-thread runtime this gives single-threaded cooperative
/// scheduling, with other tasks running while the engine works. In-flight
/// queries are independent: each owns its request document and result slot,
/// so no synchronization is needed between them.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given connection-level timeout
    pub fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    /// POST the query's request document to `url` and store the parsed
    /// response into the query
    pub async fn execute(&self, query: &mut Query, url: &str) -> DruidResult<()> {
        let body = super::request_body(query)?;
        tracing::debug!(query_type = %query.query_type(), %url, "posting druid query");

        let response = match self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(super::request_failure(query, e)),
        };

        let status = response.status();
        let text = match response.text().await {
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
