//! Prismic headless CMS access
//!
//! A thin client over the Prismic v2 REST API: master ref resolution,
//! predicate queries, cursor pagination and uid lookups.

mod client;
mod document;
mod error;
mod predicate;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{PrismicClient, QueryOptions};
pub use document::{parse_timestamp, ApiEntry, ApiRef, Document, SearchPage};
pub(crate) use document::nullable_string;
pub use error::{PrismicError, Result};
pub use predicate::{to_query, Predicate};
