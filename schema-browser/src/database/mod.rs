//! Database abstraction layer
//!
//! This module provides the query-execution boundary: a store-agnostic trait
//! and the MySQL/MariaDB implementation used in production.

pub mod mysql;
pub mod traits;

#[cfg(test)]
pub(crate) mod recording;

// Re-export the main trait
pub use traits::{QueryExecutor, StoreError};
