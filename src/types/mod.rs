//! Shared request and response types.

mod query;
mod response;

pub use query::{DateRangeQuery, TextQuery};
pub use response::{CountResponse, Created, NoContent};
