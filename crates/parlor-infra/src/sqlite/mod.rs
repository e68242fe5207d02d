//! SQLite storage layer.
//!
//! The client cache backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod cache;
pub mod pool;
