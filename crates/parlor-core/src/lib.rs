//! Business logic and port trait definitions for Parlor.
//!
//! This crate owns the chat session (`ChatStore`) and spoken playback
//! (`SpeechPlayer`), and defines the "ports" (backend, cache, view and
//! speech traits) that the infrastructure and terminal layers implement.
//! It depends only on `parlor-types` -- never on `parlor-infra` or any
//! network/database crate.

pub mod chat;
pub mod preferences;
pub mod speech;
pub mod storage;

#[cfg(test)]
mod testing;
