//! Keyed, de-duplicating query cache used by the hooks.

pub mod client;
pub mod coalesce;
pub mod key;

pub use client::{QueryClient, QueryOptions, QueryResult, QueryStatus, SharedError};
pub use key::QueryKey;
