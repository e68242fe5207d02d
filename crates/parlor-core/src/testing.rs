//! In-memory collaborators shared by the unit tests in this crate.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use parlor_types::chat::{ChatCollection, ChatId, ChatListEntry, Message};
use parlor_types::error::{RemoteError, RepositoryError, SpeechError};
use parlor_types::preferences::ModelSelector;
use parlor_types::remote::{FileUpload, UploadReceipt};
use parlor_types::speech::{Utterance, Voice};
use parlor_types::storage::CacheEntry;
use tokio::sync::Semaphore;

use crate::chat::backend::ChatBackend;
use crate::chat::view::ChatView;
use crate::speech::synthesizer::SpeechSynthesizer;
use crate::storage::cache::ClientCache;

// --- Chat backend ---

/// Backend returning scripted results and recording the calls it receives.
pub struct MockBackend {
    pub history: Mutex<Result<ChatCollection, RemoteError>>,
    pub new_chat_ids: Mutex<VecDeque<Result<ChatId, RemoteError>>>,
    pub reply: Mutex<Result<String, RemoteError>>,
    pub upload: Mutex<Result<UploadReceipt, RemoteError>>,
    pub sent: Mutex<Vec<(String, ChatId, ModelSelector)>>,
    pub uploaded: Mutex<Vec<(String, ChatId)>>,
    pub create_calls: AtomicUsize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(Ok(ChatCollection::new())),
            new_chat_ids: Mutex::new(VecDeque::new()),
            reply: Mutex::new(Ok("Hello from the server".to_string())),
            upload: Mutex::new(Ok(UploadReceipt {
                filename: "report.pdf".to_string(),
                file_type: "pdf".to_string(),
            })),
            sent: Mutex::new(Vec::new()),
            uploaded: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_history(self, history: ChatCollection) -> Self {
        *self.history.lock().unwrap() = Ok(history);
        self
    }

    pub fn with_history_error(self, error: RemoteError) -> Self {
        *self.history.lock().unwrap() = Err(error);
        self
    }

    /// Queue the result of the next `create_chat` call.
    pub fn with_new_chat(self, result: Result<&str, RemoteError>) -> Self {
        self.new_chat_ids
            .lock()
            .unwrap()
            .push_back(result.map(ChatId::from));
        self
    }

    pub fn with_reply(self, reply: Result<&str, RemoteError>) -> Self {
        *self.reply.lock().unwrap() = reply.map(str::to_string);
        self
    }

    pub fn with_upload(self, upload: Result<UploadReceipt, RemoteError>) -> Self {
        *self.upload.lock().unwrap() = upload;
        self
    }

    /// Make the server-side history include `id` (as a new, empty chat).
    fn register_chat(&self, id: &ChatId) {
        if let Ok(history) = self.history.lock().unwrap().as_mut() {
            history.ensure_chat(id.clone());
        }
    }

    pub fn sent(&self) -> Vec<(String, ChatId, ModelSelector)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn uploaded(&self) -> Vec<(String, ChatId)> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

impl ChatBackend for MockBackend {
    async fn fetch_history(&self) -> Result<ChatCollection, RemoteError> {
        self.history.lock().unwrap().clone()
    }

    async fn create_chat(&self) -> Result<ChatId, RemoteError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .new_chat_ids
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Transport("no chat id scripted".to_string())));
        if let Ok(id) = &next {
            self.register_chat(id);
        }
        next
    }

    async fn send_message(
        &self,
        message: &str,
        chat_id: &ChatId,
        model: ModelSelector,
    ) -> Result<String, RemoteError> {
        self.sent
            .lock()
            .unwrap()
            .push((message.to_string(), chat_id.clone(), model));
        self.reply.lock().unwrap().clone()
    }

    async fn upload_file(
        &self,
        file: &FileUpload,
        chat_id: &ChatId,
    ) -> Result<UploadReceipt, RemoteError> {
        self.uploaded
            .lock()
            .unwrap()
            .push((file.name.clone(), chat_id.clone()));
        self.upload.lock().unwrap().clone()
    }
}

// --- Client cache ---

/// HashMap-backed cache with switchable read/write failures.
#[derive(Default)]
pub struct MockCache {
    pub values: Mutex<HashMap<String, serde_json::Value>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: serde_json::Value) -> Self {
        self.values.lock().unwrap().insert(key.to_string(), value);
        self
    }

    pub fn raw(&self, key: &str) -> Option<serde_json::Value> {
        self.values.lock().unwrap().get(key).cloned()
    }
}

impl ClientCache for MockCache {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, RepositoryError> {
        if self.fail_reads {
            return Err(RepositoryError::Connection);
        }
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
        Ok(self.values.lock().unwrap().remove(key).is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>, RepositoryError> {
        let mut keys: Vec<String> = self.values.lock().unwrap().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>, RepositoryError> {
        Ok(self.raw(key).map(|value| CacheEntry {
            key: key.to_string(),
            value,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }))
    }
}

// --- Chat view ---

/// Everything the store asked the view to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Clear,
    Message(Message),
    ChatList(Vec<ChatListEntry>),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    /// Messages rendered since the most recent clear.
    pub fn transcript(&self) -> Vec<Message> {
        let start = self
            .events
            .iter()
            .rposition(|e| matches!(e, ViewEvent::Clear))
            .map_or(0, |i| i + 1);
        self.events[start..]
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn rendered_texts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Message(m) => Some(m.text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_chat_list(&self) -> Option<&[ChatListEntry]> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::ChatList(entries) => Some(entries.as_slice()),
            _ => None,
        })
    }
}

impl ChatView for RecordingView {
    fn clear_transcript(&mut self) {
        self.events.push(ViewEvent::Clear);
    }

    fn render_message(&mut self, message: &Message) {
        self.events.push(ViewEvent::Message(message.clone()));
    }

    fn render_chat_list(&mut self, entries: &[ChatListEntry]) {
        self.events.push(ViewEvent::ChatList(entries.to_vec()));
    }
}

// --- Speech synthesizers ---

/// Completes every utterance immediately and records it.
pub struct RecordingSynthesizer {
    available: bool,
    voices: Vec<Voice>,
    spoken: Mutex<Vec<Utterance>>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::with_voices(Vec::new())
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            available: true,
            voices,
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for RecordingSynthesizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        self.spoken.lock().unwrap().push(utterance);
        Ok(())
    }

    fn cancel(&self) {}
}

/// Holds every utterance until the test calls `release`.
pub struct GatedSynthesizer {
    gate: Semaphore,
    started: Mutex<Vec<String>>,
    cancels: AtomicUsize,
}

impl GatedSynthesizer {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
        }
    }

    /// Let one pending utterance finish.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl SpeechSynthesizer for GatedSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        self.started.lock().unwrap().push(utterance.text);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| SpeechError::Interrupted)?;
        permit.forget();
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Fails the utterance with the given zero-based index.
pub struct FailingSynthesizer {
    fail_at: usize,
    attempts: AtomicUsize,
}

impl FailingSynthesizer {
    pub fn failing_at(fail_at: usize) -> Self {
        Self {
            fail_at,
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl SpeechSynthesizer for FailingSynthesizer {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(&self, _utterance: Utterance) -> Result<(), SpeechError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt == self.fail_at {
            Err(SpeechError::Synthesis("audio device lost".to_string()))
        } else {
            Ok(())
        }
    }

    fn cancel(&self) {}
}
