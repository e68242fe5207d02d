//! Shared domain types for Parlor.
//!
//! This crate contains the domain types used across the Parlor client:
//! chats and messages, speech utterances, UI preferences, configuration,
//! chat server payloads, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod preferences;
pub mod remote;
pub mod speech;
pub mod storage;
