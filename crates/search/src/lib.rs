//! Universal search over employees and customers.
//!
//! Records are projected on demand into [`SearchIndexEntry`] values; nothing
//! is persisted. A [`SearchQuery`] matches names and emails by
//! case-insensitive substring, and phone/identity fields after the same
//! normalization the projection applied.

pub mod entry;
pub mod query;

pub use entry::{EntityType, SearchIndexEntry};
pub use query::{MIN_QUERY_LEN, SearchQuery, search};
