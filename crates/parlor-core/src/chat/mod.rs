//! Chat history, selection, and message flow.
//!
//! `ChatStore` owns the session state and drives the `ChatBackend`,
//! `ClientCache` and `ChatView` ports. Bot replies are handed to the
//! `SpeechPlayer` when spoken playback is on.

pub mod backend;
pub mod session;
pub mod store;
pub mod view;
