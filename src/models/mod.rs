//! Data models for the roster client.
//!
//! Wire types match the remote collection endpoint; the rest is client-side state.

mod member;
mod options;
mod query;

pub use member::*;
pub use options::*;
pub use query::*;
