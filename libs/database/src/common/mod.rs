//! Common utilities shared across database helpers

pub mod error;

pub use error::{DatabaseError, DatabaseResult};
