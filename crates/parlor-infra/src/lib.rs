//! Infrastructure layer for Parlor.
//!
//! Contains implementations of the port traits defined in `parlor-core`:
//! the HTTP chat backend, the SQLite client cache, command-line speech
//! adapters, plus configuration loading and data directory helpers.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod speech;
pub mod sqlite;
