//! HTTP adapter for the chat server.

pub mod client;
