//! Storage abstractions for Parlor.
//!
//! Defines the persistent client cache trait. Implementations live in
//! parlor-infra.

pub mod cache;
