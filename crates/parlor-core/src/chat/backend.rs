//! ChatBackend trait definition.
//!
//! The remote chat server is the source of truth for chat history and the
//! only thing that talks to a model. Follows the same RPITIT pattern as the
//! cache trait.

use parlor_types::chat::{ChatCollection, ChatId};
use parlor_types::error::RemoteError;
use parlor_types::preferences::ModelSelector;
use parlor_types::remote::{FileUpload, UploadReceipt};

/// Remote collaborator providing history, chat creation, replies and uploads.
///
/// Implementations live in parlor-infra (e.g., `HttpChatBackend`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatBackend: Send + Sync {
    /// Fetch every chat the server knows about.
    ///
    /// An empty collection means "nothing server-side yet".
    fn fetch_history(
        &self,
    ) -> impl std::future::Future<Output = Result<ChatCollection, RemoteError>> + Send;

    /// Allocate a new chat and return its identifier.
    fn create_chat(&self) -> impl std::future::Future<Output = Result<ChatId, RemoteError>> + Send;

    /// Send a user message and return the model's reply text.
    ///
    /// An `{"error": ...}` answer maps to `RemoteError::Server`.
    fn send_message(
        &self,
        message: &str,
        chat_id: &ChatId,
        model: ModelSelector,
    ) -> impl std::future::Future<Output = Result<String, RemoteError>> + Send;

    /// Upload a file into a chat.
    fn upload_file(
        &self,
        upload: &FileUpload,
        chat_id: &ChatId,
    ) -> impl std::future::Future<Output = Result<UploadReceipt, RemoteError>> + Send;
}
