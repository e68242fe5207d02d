//! HttpChatBackend -- concrete [`ChatBackend`] implementation over HTTP.
//!
//! Talks to the chat server's JSON endpoints:
//!
//! | Operation       | Request                        | Success body                      |
//! |-----------------|--------------------------------|-----------------------------------|
//! | fetch history   | `GET /get_chat_history`        | `{chatId: [message, ...]}`        |
//! | create chat     | `POST /new_chat`               | `{"chatId": "..."}`               |
//! | send message    | `POST /chat` (JSON)            | `{"response": "...", ...}`        |
//! | upload file     | `POST /upload` (multipart)     | `{"message", "filename", "type"}` |
//!
//! Failed `/chat` and `/upload` calls answer `{"error": "..."}`, which is
//! surfaced as [`RemoteError::Server`]. Requests carry no client-side
//! timeout; a slow model reply is awaited for as long as the server takes.

use parlor_core::chat::backend::ChatBackend;
use parlor_types::chat::{ChatCollection, ChatId};
use parlor_types::error::RemoteError;
use parlor_types::preferences::ModelSelector;
use parlor_types::remote::{
    FileUpload, NewChatResponse, SendReply, SendRequest, UploadReceipt, UploadReply,
};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Chat server client.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| RemoteError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

// ---------------------------------------------------------------------------
// Response interpretation
// ---------------------------------------------------------------------------

fn transport(e: reqwest::Error) -> RemoteError {
    RemoteError::Transport(format!("HTTP request failed: {e}"))
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
    let body = response.text().await.map_err(transport)?;
    parse_body(&body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, RemoteError> {
    serde_json::from_str(body).map_err(|e| RemoteError::MalformedPayload(e.to_string()))
}

fn interpret_send_reply(status: StatusCode, reply: SendReply) -> Result<String, RemoteError> {
    if let Some(error) = reply.error {
        return Err(RemoteError::Server(error));
    }
    match reply.response {
        Some(text) if status.is_success() => Ok(text),
        Some(_) | None if !status.is_success() => {
            Err(RemoteError::Transport(format!("HTTP {status}")))
        }
        _ => Err(RemoteError::MalformedPayload(
            "reply has neither 'response' nor 'error'".to_string(),
        )),
    }
}

fn interpret_upload_reply(
    status: StatusCode,
    reply: UploadReply,
    sent_name: &str,
) -> Result<UploadReceipt, RemoteError> {
    if !status.is_success() {
        return Err(RemoteError::Server(
            reply.error.unwrap_or_else(|| format!("HTTP {status}")),
        ));
    }
    let file_type = reply
        .file_type
        .ok_or_else(|| RemoteError::MalformedPayload("upload reply missing 'type'".to_string()))?;
    Ok(UploadReceipt {
        filename: reply.filename.unwrap_or_else(|| sent_name.to_string()),
        file_type,
    })
}

// ---------------------------------------------------------------------------
// ChatBackend implementation
// ---------------------------------------------------------------------------

impl ChatBackend for HttpChatBackend {
    async fn fetch_history(&self) -> Result<ChatCollection, RemoteError> {
        let response = self
            .client
            .get(self.url("/get_chat_history"))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Transport(format!("HTTP {status}")));
        }
        let histories: ChatCollection = read_json(response).await?;
        debug!(chats = histories.len(), "fetched chat history");
        Ok(histories)
    }

    async fn create_chat(&self) -> Result<ChatId, RemoteError> {
        let response = self
            .client
            .post(self.url("/new_chat"))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Transport(format!("HTTP {status}")));
        }
        let created: NewChatResponse = read_json(response).await?;
        Ok(created.chat_id)
    }

    async fn send_message(
        &self,
        message: &str,
        chat_id: &ChatId,
        model: ModelSelector,
    ) -> Result<String, RemoteError> {
        let body = SendRequest {
            message: message.to_string(),
            chat_id: chat_id.clone(),
            model,
        };

        let response = self
            .client
            .post(self.url("/chat"))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        // Error replies carry a JSON body too, so parse before checking status.
        let status = response.status();
        let reply: SendReply = match read_json(response).await {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => {
                return Err(RemoteError::Transport(format!("HTTP {status}")));
            }
            Err(e) => return Err(e),
        };
        interpret_send_reply(status, reply)
    }

    async fn upload_file(
        &self,
        upload: &FileUpload,
        chat_id: &ChatId,
    ) -> Result<UploadReceipt, RemoteError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("chatId", chat_id.to_string());

        let response = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let reply: UploadReply = match read_json(response).await {
            Ok(reply) => reply,
            Err(_) if !status.is_success() => UploadReply::default(),
            Err(e) => return Err(e),
        };
        interpret_upload_reply(status, reply, &upload.name)
    }
}
