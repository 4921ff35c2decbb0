//! Query components
//!
//! Typed specifications for the nested pieces of a query document:
//!
//! - [`filter`]: row filters (selector, regex, javascript, and/or/not)
//! - [`aggregation`]: named aggregators (count, sums, min/max, hyperUnique)
//! - [`having`]: post-aggregation row conditions for groupBy queries
//! - [`postaggregation`]: arithmetic over aggregator outputs
//!
//! Each module pairs its spec type with a pure `build_*` function that
//! lowers the spec to the JSON fragment embedded in the request document.
//! Lowering can fail with [`DruidError::Spec`](crate::error::DruidError)
//! for malformed specs (e.g. an `and` filter with no operands); the query
//! builder propagates such failures verbatim.

pub mod aggregation;
pub mod filter;
pub mod having;
pub mod postaggregation;

pub use aggregation::{build_aggregators, Aggregator};
pub use filter::{build_filter, Dimension, Filter};
pub use having::{build_having, Having};
pub use postaggregation::{build_post_aggregators, PostAggregation};
