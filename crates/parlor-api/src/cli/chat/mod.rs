//! Interactive terminal chat for Parlor.
//!
//! The chat loop drives a `ChatStore` rendering into a `TerminalView`:
//! typed and dictated messages, slash commands, uploads and spoken replies.
//! Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod view;
