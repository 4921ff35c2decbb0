//! Druid client facades
//!
//! A facade binds connection settings, one query builder, and one transport,
//! and exposes one method per query type. No per-type behavior lives here:
//! each method validates and assembles through the shared builder, executes
//! through the bound transport, and returns the populated [`Query`] (or the
//! first error encountered).

use crate::config::DruidConfig;
use crate::error::DruidResult;
use crate::query::{Query, QueryArgs, QueryBuilder};
use crate::transport::{BlockingHttpTransport, HttpTransport};

/// Asynchronous Druid client
///
/// Query methods return futures that suspend at the network boundary;
/// multiple in-flight queries interleave freely since each owns its own
/// request document and result slot.
pub struct DruidClient {
    config: DruidConfig,
    query_builder: QueryBuilder,
    transport: HttpTransport,
}

impl DruidClient {
    /// Create a client for the configured broker
    pub fn new(config: DruidConfig) -> Self {
        let transport = HttpTransport::new(config.request_timeout_ms);
        Self {
            config,
            query_builder: QueryBuilder::new(),
            transport,
        }
    }

    /// Connection settings this client was built with
    pub fn config(&self) -> &DruidConfig {
        &self.config
    }

    async fn execute(&self, mut query: Query) -> DruidResult<Query> {
        self.transport
            .execute(&mut query, &self.config.query_url())
            .await?;
        Ok(query)
    }

    /// Run a topN query
    pub async fn topn(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.topn(args)?).await
    }

    /// Run a timeseries query
    pub async fn timeseries(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.timeseries(args)?).await
    }

    /// Run a groupBy query
    pub async fn groupby(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.groupby(args)?).await
    }

    /// Run a segmentMetadata query
    pub async fn segment_metadata(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.segment_metadata(args)?).await
    }

    /// Run a timeBoundary query
    pub async fn time_boundary(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.time_boundary(args)?).await
    }

    /// Run a select query
    pub async fn select(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.select(args)?).await
    }
}

/// Blocking Druid client
///
/// Same API and error behavior as [`DruidClient`]; each query occupies the
/// calling thread until it completes. Must not be used from inside an
/// asynchronous runtime.
pub struct BlockingDruidClient {
    config: DruidConfig,
    query_builder: QueryBuilder,
    transport: BlockingHttpTransport,
}

impl BlockingDruidClient {
    /// Create a client for the configured broker
    pub fn new(config: DruidConfig) -> Self {
        let transport = BlockingHttpTransport::new(config.request_timeout_ms);
        Self {
            config,
            query_builder: QueryBuilder::new(),
            transport,
        }
    }

    /// Connection settings this client was built with
    pub fn config(&self) -> &DruidConfig {
        &self.config
    }

    fn execute(&self, mut query: Query) -> DruidResult<Query> {
        self.transport
            .execute(&mut query, &self.config.query_url())?;
        Ok(query)
    }

    /// Run a topN query
    pub fn topn(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.topn(args)?)
    }

    /// Run a timeseries query
    pub fn timeseries(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.timeseries(args)?)
    }

    /// Run a groupBy query
    pub fn groupby(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.groupby(args)?)
    }

    /// Run a segmentMetadata query
    pub fn segment_metadata(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.segment_metadata(args)?)
    }

    /// Run a timeBoundary query
    pub fn time_boundary(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.time_boundary(args)?)
    }

    /// Run a select query
    pub fn select(&self, args: QueryArgs) -> DruidResult<Query> {
        self.execute(self.query_builder.select(args)?)
    }
}
