//! Request and response payloads exchanged with the chat server.

use serde::{Deserialize, Serialize};

use crate::chat::ChatId;
use crate::preferences::ModelSelector;

/// File extensions the server accepts for upload.
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Whether a file name carries an extension the server accepts.
pub fn is_allowed_upload(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .is_some_and(|ext| ALLOWED_UPLOAD_EXTENSIONS.contains(&ext.as_str()))
}

/// `POST /new_chat` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatResponse {
    #[serde(rename = "chatId")]
    pub chat_id: ChatId,
}

/// `POST /chat` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub message: String,
    #[serde(rename = "chatId")]
    pub chat_id: ChatId,
    pub model: ModelSelector,
}

/// `POST /chat` response body: either `{response, ...}` or `{error}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `POST /upload` response body: either `{message, filename, type}` or `{error}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A file selected by the user for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What the server reported after storing an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub filename: String,
    /// `"pdf"` or `"image"`.
    pub file_type: String,
}
