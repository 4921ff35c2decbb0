//! # druid-client
//!
//! Client library for querying [Apache Druid](https://druid.apache.org/),
//! a columnar, time-partitioned analytics engine, over its HTTP query
//! endpoint.
//!
//! ## Features
//!
//! - **Validated construction**: per-query-type argument schemas catch
//!   unknown components before any network I/O
//! - **Typed components**: filters, aggregators, having clauses, and
//!   post-aggregations built from typed specs
//! - **Two transports**: an asynchronous client that suspends at the
//!   network boundary and a blocking client with identical behavior
//! - **Tabular export**: flatten timeseries/topN/groupBy results into
//!   records or tab-separated text
//!
//! ## Modules
//!
//! - [`client`]: the per-query-type facades
//! - [`query`]: argument validation, request-document assembly, results
//! - [`components`]: filter/aggregation/having/post-aggregation specs
//! - [`transport`]: HTTP dispatch and error translation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use druid_client::components::{aggregation, Dimension};
//! use druid_client::{DruidClient, DruidConfig, QueryArgs};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DruidClient::new(DruidConfig::new("http://localhost:8082", "druid/v2"));
//!
//!     let top = client
//!         .topn(
//!             QueryArgs::new()
//!                 .datasource("twitterstream")
//!                 .granularity("all")
//!                 .intervals("2013-10-04/pt1h")
//!                 .aggregations(vec![aggregation::doublesum("count", "count")])
//!                 .dimension("user_name")
//!                 .filter(Dimension::new("user_lang").eq("en"))
//!                 .metric("count")
//!                 .threshold(2),
//!         )
//!         .await?;
//!
//!     for row in top.export_records()? {
//!         println!("{row:?}");
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod components;
pub mod config;
pub mod error;
pub mod query;
pub mod transport;

// Re-export top-level types for convenience
pub use client::{BlockingDruidClient, DruidClient};

pub use components::{Aggregator, Dimension, Filter, Having, PostAggregation};

pub use config::DruidConfig;

pub use error::{DruidError, DruidResult, HttpFailure};

pub use query::{Query, QueryArg, QueryArgs, QueryBuilder, QueryType};

pub use transport::{BlockingHttpTransport, HttpTransport};
