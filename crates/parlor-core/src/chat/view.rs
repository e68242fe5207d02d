//! Rendering port for the transcript and the chat list.

use parlor_types::chat::{ChatListEntry, Message};

/// Receives every visible change the chat store makes.
///
/// The terminal UI in parlor-api implements this; tests use a recording
/// implementation.
pub trait ChatView: Send {
    /// Remove every message from the displayed transcript.
    fn clear_transcript(&mut self);

    /// Append one message to the displayed transcript.
    fn render_message(&mut self, message: &Message);

    /// Redraw the chat list (newest first, active entry flagged).
    fn render_chat_list(&mut self, entries: &[ChatListEntry]);
}
