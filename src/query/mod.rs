//! Query construction and results
//!
//! The transport-agnostic half of the client:
//!
//! - **Args**: caller-side named arguments ([`QueryArgs`])
//! - **Builder**: per-query-type validation and request-document assembly
//! - **Types**: the [`QueryType`] enumeration and the [`Query`] round-trip
//!   container
//! - **Export**: flattening typed result payloads into records or TSV
//!
//! A [`Query`] is produced in an unexecuted state by [`QueryBuilder`]; a
//! transport fills in its result exactly once on success. Construction
//! failures (unknown argument names, malformed component specs) surface
//! before any network I/O.

mod args;
mod builder;
mod export;
mod types;

pub use args::{QueryArg, QueryArgs};
pub use builder::QueryBuilder;
pub use types::{Query, QueryType};
