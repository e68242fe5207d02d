//! Chat store: active chat, history sync, and the message flow.
//!
//! The server is the source of truth for history; the client cache holds
//! the last known collection and the active chat id so a session survives
//! restarts and server outages. Every visible change goes through the
//! `ChatView`, and bot replies are spoken when playback is enabled.

use parlor_types::chat::{ChatCollection, ChatId, ChatListEntry, Message, MessageOrigin};
use parlor_types::error::{ChatError, RemoteError};
use parlor_types::preferences::ModelSelector;
use parlor_types::remote::{FileUpload, is_allowed_upload};
use parlor_types::storage::keys;
use tracing::{debug, info, warn};

use crate::chat::backend::ChatBackend;
use crate::chat::session::SessionState;
use crate::chat::view::ChatView;
use crate::speech::player::SpeechPlayer;
use crate::speech::synthesizer::SpeechSynthesizer;
use crate::storage::cache::{ClientCache, load_json, store_json};

const CREATE_CHAT_FAILED: &str = "Error: Could not create a new chat. Please try again.";
const UPLOAD_TYPE_REJECTED: &str = "Error uploading file: File type not allowed";
const UPLOAD_FAILED: &str = "Error uploading file. Please try again.";

/// Owns one chat client session.
///
/// Generic over its collaborators so the core never depends on
/// parlor-infra or on a particular terminal renderer.
pub struct ChatStore<B, C, V, S>
where
    B: ChatBackend,
    C: ClientCache,
    V: ChatView,
    S: SpeechSynthesizer,
{
    backend: B,
    cache: C,
    view: V,
    speech: SpeechPlayer<S>,
    state: SessionState,
}

impl<B, C, V, S> ChatStore<B, C, V, S>
where
    B: ChatBackend,
    C: ClientCache,
    V: ChatView,
    S: SpeechSynthesizer,
{
    /// Create a store with an empty session. Call [`restore`](Self::restore)
    /// to pick up the cached session.
    pub fn new(backend: B, cache: C, view: V, speech: SpeechPlayer<S>) -> Self {
        Self {
            backend,
            cache,
            view,
            speech,
            state: SessionState::default(),
        }
    }

    /// Reload the active chat id and the chat collection from the cache.
    ///
    /// Unreadable entries are logged and treated as absent.
    pub async fn restore(&mut self) {
        let current = match load_json::<_, ChatId>(&self.cache, keys::CURRENT_CHAT_ID).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "failed to read cached chat id");
                None
            }
        };
        let histories = match load_json::<_, ChatCollection>(&self.cache, keys::CHAT_HISTORIES).await
        {
            Ok(histories) => histories.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "failed to read cached chat histories");
                ChatCollection::new()
            }
        };

        debug!(
            chats = histories.len(),
            current = ?current.as_ref().map(ChatId::as_str),
            "restored cached session"
        );
        let model = self.state.model();
        self.state = SessionState::new(current, histories);
        self.state.set_model(model);
    }

    /// Restore, sync with the server, and make sure a chat is active.
    ///
    /// A failure to create the first chat is already shown in the
    /// transcript and does not fail startup.
    pub async fn start(&mut self) {
        self.restore().await;
        self.load_history().await;
        if self.state.current_chat_id().is_none() {
            let _ = self.create_chat().await;
        }
    }

    /// Sync the chat collection with the server.
    ///
    /// A non-empty server snapshot replaces the local one; otherwise the
    /// cached collection is kept. The result is always written back to the
    /// cache. Afterwards the most recent chat is selected when none is
    /// active, or the active chat is redisplayed.
    pub async fn load_history(&mut self) -> &ChatCollection {
        let remote = match self.backend.fetch_history().await {
            Ok(histories) => histories,
            Err(e) => {
                warn!(error = %e, "failed to fetch chat history, using cached copy");
                ChatCollection::new()
            }
        };

        let histories = if remote.is_empty() {
            match load_json::<_, ChatCollection>(&self.cache, keys::CHAT_HISTORIES).await {
                Ok(Some(cached)) => cached,
                Ok(None) => self.state.histories().clone(),
                Err(e) => {
                    warn!(error = %e, "failed to read cached chat histories");
                    self.state.histories().clone()
                }
            }
        } else {
            remote
        };

        info!(chats = histories.len(), "chat history loaded");
        self.state.replace_histories(histories);
        self.persist_histories().await;

        let target = match self.state.current_chat_id() {
            Some(current) => Some(current.clone()),
            None => self.state.histories().most_recent().cloned(),
        };
        match target {
            Some(id) => self.select_chat(id).await,
            None => self.render_chat_list(),
        }

        self.state.histories()
    }

    /// Ask the server for a new chat and make it active.
    ///
    /// On failure the previously active chat stays active and an error
    /// notice is shown in the transcript.
    pub async fn create_chat(&mut self) -> Result<ChatId, ChatError> {
        match self.backend.create_chat().await {
            Ok(id) => {
                info!(chat_id = %id, "chat created");
                self.state.set_current_chat_id(id.clone());
                self.persist_current_chat_id().await;
                self.view.clear_transcript();
                self.load_history().await;
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "failed to create chat");
                self.view.render_message(&Message::bot(CREATE_CHAT_FAILED));
                Err(e.into())
            }
        }
    }

    /// Make `id` the active chat and replay its messages.
    pub async fn select_chat(&mut self, id: ChatId) {
        debug!(chat_id = %id, "selecting chat");
        self.state.set_current_chat_id(id);
        self.persist_current_chat_id().await;

        self.view.clear_transcript();
        for message in self.state.current_messages() {
            self.view.render_message(message);
        }
        self.render_chat_list();
    }

    /// Append a message to the active chat and show it.
    ///
    /// Blank user messages are rejected (returns `false`, nothing is
    /// stored or rendered). Bot messages are accepted as-is. With no active
    /// chat the message is shown but not stored.
    pub async fn append_message(&mut self, text: impl Into<String>, origin: MessageOrigin) -> bool {
        let message = Message::new(text, origin);
        if origin.is_user() && message.text.trim().is_empty() {
            debug!("ignoring blank user message");
            return false;
        }

        if self.state.append_to_current(message.clone()) {
            self.persist_histories().await;
        } else {
            debug!("no active chat, message not stored");
        }

        self.view.render_message(&message);

        if !origin.is_user() && self.speech.is_enabled() {
            self.speech.speak(&message.text);
        }
        true
    }

    /// Send user input to the server and show the reply.
    ///
    /// Creates a chat first when none is active. Server and transport
    /// failures are shown in the transcript and do not fail the call.
    pub async fn send_user_message(&mut self, input: &str) -> Result<(), ChatError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(ChatError::Validation("message is empty".to_string()));
        }

        let chat_id = self.ensure_active_chat().await?;
        self.append_message(text, MessageOrigin::User).await;

        let model = self.state.model();
        let reply = match self.backend.send_message(text, &chat_id, model).await {
            Ok(reply) => reply,
            Err(RemoteError::Server(msg)) => {
                warn!(chat_id = %chat_id, error = %msg, "server rejected message");
                format!("Error: {msg}")
            }
            Err(e) => {
                warn!(chat_id = %chat_id, model = %model, error = %e, "failed to get a reply");
                format!("Error: Could not get response from {}", model.label())
            }
        };
        self.append_message(reply, MessageOrigin::Bot).await;
        Ok(())
    }

    /// Upload a file into the active chat.
    ///
    /// Files with an extension the server does not accept are refused
    /// locally without contacting the server.
    pub async fn upload_file(&mut self, upload: FileUpload) -> Result<(), ChatError> {
        if !is_allowed_upload(&upload.name) {
            warn!(file = %upload.name, "refusing upload with unsupported file type");
            self.append_message(UPLOAD_TYPE_REJECTED, MessageOrigin::Bot).await;
            return Err(ChatError::Validation(format!(
                "file type not allowed: {}",
                upload.name
            )));
        }

        let chat_id = self.ensure_active_chat().await?;
        match self.backend.upload_file(&upload, &chat_id).await {
            Ok(receipt) => {
                info!(chat_id = %chat_id, file = %receipt.filename, "file uploaded");
                self.append_message(format!("File uploaded: {}", upload.name), MessageOrigin::User)
                    .await;
                self.append_message(
                    format!(
                        "You can now ask questions about the {}. What would you like to know?",
                        receipt.file_type
                    ),
                    MessageOrigin::Bot,
                )
                .await;
            }
            Err(RemoteError::Server(msg)) => {
                warn!(file = %upload.name, error = %msg, "server rejected upload");
                self.append_message(format!("Error uploading file: {msg}"), MessageOrigin::Bot)
                    .await;
            }
            Err(e) => {
                warn!(file = %upload.name, error = %e, "upload failed");
                self.append_message(UPLOAD_FAILED, MessageOrigin::Bot).await;
            }
        }
        Ok(())
    }

    pub fn model(&self) -> ModelSelector {
        self.state.model()
    }

    /// Switch the model used for subsequent messages.
    pub fn set_model(&mut self, model: ModelSelector) {
        info!(model = %model, "model switched");
        self.state.set_model(model);
    }

    /// Chat list entries (newest first) with the active chat flagged.
    pub fn chat_list(&self) -> Vec<ChatListEntry> {
        self.state
            .histories()
            .list_entries(self.state.current_chat_id())
    }

    /// Redraw the chat list.
    pub fn render_chat_list(&mut self) {
        let entries = self.chat_list();
        self.view.render_chat_list(&entries);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn speech(&self) -> &SpeechPlayer<S> {
        &self.speech
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Internals ---

    async fn ensure_active_chat(&mut self) -> Result<ChatId, ChatError> {
        match self.state.current_chat_id() {
            Some(id) => Ok(id.clone()),
            None => self.create_chat().await,
        }
    }

    async fn persist_histories(&self) {
        if let Err(e) = store_json(&self.cache, keys::CHAT_HISTORIES, self.state.histories()).await {
            warn!(error = %e, "failed to cache chat histories");
        }
    }

    async fn persist_current_chat_id(&self) {
        let Some(id) = self.state.current_chat_id() else {
            return;
        };
        if let Err(e) = store_json(&self.cache, keys::CURRENT_CHAT_ID, id).await {
            warn!(error = %e, "failed to cache active chat id");
        }
    }
}
