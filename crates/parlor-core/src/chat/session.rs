//! Session state owned by the chat store.
//!
//! Holds the active chat selection, the in-memory chat collection, and the
//! model selector. There is exactly one `SessionState` per `ChatStore`;
//! nothing here is process-global.

use parlor_types::chat::{ChatCollection, ChatId, Message};
use parlor_types::preferences::ModelSelector;

/// Mutable state of a single chat client session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current_chat_id: Option<ChatId>,
    histories: ChatCollection,
    model: ModelSelector,
}

impl SessionState {
    /// Create a session state from restored values.
    pub fn new(current_chat_id: Option<ChatId>, histories: ChatCollection) -> Self {
        Self {
            current_chat_id,
            histories,
            model: ModelSelector::default(),
        }
    }

    /// The active chat, if any.
    pub fn current_chat_id(&self) -> Option<&ChatId> {
        self.current_chat_id.as_ref()
    }

    pub fn set_current_chat_id(&mut self, id: ChatId) {
        self.current_chat_id = Some(id);
    }

    /// All chats known to this session.
    pub fn histories(&self) -> &ChatCollection {
        &self.histories
    }

    /// Replace the whole collection (after a server sync).
    pub fn replace_histories(&mut self, histories: ChatCollection) {
        self.histories = histories;
    }

    /// Append to the active chat. Returns `false` when no chat is active.
    pub fn append_to_current(&mut self, message: Message) -> bool {
        match &self.current_chat_id {
            Some(id) => {
                self.histories.append(id.clone(), message);
                true
            }
            None => false,
        }
    }

    /// Messages of the active chat (empty when none is active or known).
    pub fn current_messages(&self) -> &[Message] {
        self.current_chat_id
            .as_ref()
            .and_then(|id| self.histories.messages(id))
            .unwrap_or(&[])
    }

    pub fn model(&self) -> ModelSelector {
        self.model
    }

    pub fn set_model(&mut self, model: ModelSelector) {
        self.model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_state() {
        let state = SessionState::default();
        assert!(state.current_chat_id().is_none());
        assert!(state.histories().is_empty());
        assert_eq!(state.model(), ModelSelector::Gemini);
    }

    #[test]
    fn test_append_without_active_chat() {
        let mut state = SessionState::default();
        assert!(!state.append_to_current(Message::user("lost")));
        assert!(state.histories().is_empty());
    }

    #[test]
    fn test_append_creates_chat_entry() {
        let mut state = SessionState::default();
        state.set_current_chat_id(ChatId::from("c1"));
        assert!(state.append_to_current(Message::user("hi")));
        assert!(state.append_to_current(Message::bot("hello")));

        assert_eq!(state.current_messages().len(), 2);
        assert!(state.histories().contains(&ChatId::from("c1")));
    }

    #[test]
    fn test_switch_model() {
        let mut state = SessionState::default();
        state.set_model(ModelSelector::Azure);
        assert_eq!(state.model(), ModelSelector::Azure);
    }
}
