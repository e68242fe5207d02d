//! Chat, message, and chat collection types for Parlor.
//!
//! These types model the conversation history shared between the client
//! cache and the chat server: a collection of chats keyed by an opaque,
//! time-ordered identifier, each holding an ordered list of messages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of characters of the first message shown as a chat title.
pub const TITLE_PREVIEW_CHARS: usize = 30;

/// Title shown for a chat that has no messages yet.
pub const UNTITLED_CHAT: &str = "New Chat";

/// Opaque chat identifier allocated by the server.
///
/// Identifiers are chosen so that string order equals chronological order
/// (the server uses `%Y%m%d%H%M%S` timestamps), which is what "most recent"
/// selection relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChatId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    User,
    Bot,
}

impl MessageOrigin {
    pub fn is_user(self) -> bool {
        matches!(self, MessageOrigin::User)
    }
}

impl fmt::Display for MessageOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageOrigin::User => write!(f, "user"),
            MessageOrigin::Bot => write!(f, "bot"),
        }
    }
}

/// Metadata of a file the server attached to a message after an upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// `"pdf"` or `"image"`.
    #[serde(rename = "type")]
    pub file_type: String,
    /// Extracted text (PDF) or base64 payload (image).
    #[serde(default)]
    pub content: String,
    pub name: String,
}

/// A single turn in a chat.
///
/// Serialized with the field names the chat server and the browser cache
/// have always used (`text`, `isUser`), so snapshots from either side
/// deserialize into the same type. Server-only fields are kept when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    #[serde(rename = "isUser")]
    pub is_user: bool,
    /// `HH:MM` stamp added by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
}

impl Message {
    pub fn new(text: impl Into<String>, origin: MessageOrigin) -> Self {
        Self {
            text: text.into(),
            is_user: origin.is_user(),
            timestamp: None,
            file: None,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, MessageOrigin::User)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, MessageOrigin::Bot)
    }

    pub fn origin(&self) -> MessageOrigin {
        if self.is_user {
            MessageOrigin::User
        } else {
            MessageOrigin::Bot
        }
    }
}

/// All known chats, keyed by identifier.
///
/// Backed by a `BTreeMap` so iteration follows identifier string order;
/// the greatest key is the most recent chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatCollection(BTreeMap<ChatId, Vec<Message>>);

impl ChatCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: &ChatId) -> bool {
        self.0.contains_key(id)
    }

    /// Messages of a chat in display order.
    pub fn messages(&self, id: &ChatId) -> Option<&[Message]> {
        self.0.get(id).map(Vec::as_slice)
    }

    /// Append a message to a chat, creating the chat if absent.
    pub fn append(&mut self, id: ChatId, message: Message) {
        self.0.entry(id).or_default().push(message);
    }

    /// Register an empty chat if it does not exist yet.
    pub fn ensure_chat(&mut self, id: ChatId) {
        self.0.entry(id).or_default();
    }

    /// The chat with the greatest identifier.
    pub fn most_recent(&self) -> Option<&ChatId> {
        self.0.keys().next_back()
    }

    /// Chat identifiers, newest first.
    pub fn ids_newest_first(&self) -> impl Iterator<Item = &ChatId> {
        self.0.keys().rev()
    }

    /// Display title: the first message truncated, or "New Chat".
    pub fn title(&self, id: &ChatId) -> String {
        let first = self
            .0
            .get(id)
            .and_then(|messages| messages.first())
            .map(|m| m.text.as_str())
            .filter(|text| !text.is_empty());

        match first {
            Some(text) => truncate_title(text),
            None => UNTITLED_CHAT.to_string(),
        }
    }

    /// Build chat list entries (newest first) with `active` highlighted.
    pub fn list_entries(&self, active: Option<&ChatId>) -> Vec<ChatListEntry> {
        self.ids_newest_first()
            .map(|id| ChatListEntry {
                id: id.clone(),
                title: self.title(id),
                message_count: self.0.get(id).map_or(0, Vec::len),
                active: active == Some(id),
            })
            .collect()
    }
}

impl FromIterator<(ChatId, Vec<Message>)> for ChatCollection {
    fn from_iter<I: IntoIterator<Item = (ChatId, Vec<Message>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn truncate_title(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(TITLE_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// One row of the chat list shown beside the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatListEntry {
    pub id: ChatId,
    pub title: String,
    pub message_count: usize,
    pub active: bool,
}
