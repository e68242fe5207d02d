//! Client configuration types for Parlor.
//!
//! `ClientConfig` represents the `config.toml` in the data directory that
//! controls the chat server address, the default model, and the speech
//! backends.

use serde::{Deserialize, Serialize};

use crate::preferences::ModelSelector;
use crate::speech::DEFAULT_MAX_CHUNK_LEN;

/// Top-level client configuration.
///
/// Loaded from `~/.parlor/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the chat server.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Model selector used until the user switches.
    #[serde(default)]
    pub default_model: ModelSelector,

    #[serde(default)]
    pub speech: SpeechConfig,

    /// Speech-to-text command. Voice input is disabled when absent.
    #[serde(default)]
    pub recognition: Option<RecognitionConfig>,
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            default_model: ModelSelector::default(),
            speech: SpeechConfig::default(),
            recognition: None,
        }
    }
}

/// Spoken playback of bot replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Whether bot replies are spoken from the start of a session.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_max_chunk_len")]
    pub max_chunk_len: usize,

    /// Synthesizer executable (espeak-ng compatible command line).
    #[serde(default = "default_speech_command")]
    pub command: String,

    /// Extra arguments placed before the generated voice/rate/pitch flags.
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_max_chunk_len() -> usize {
    DEFAULT_MAX_CHUNK_LEN
}

fn default_speech_command() -> String {
    "espeak-ng".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_chunk_len: default_max_chunk_len(),
            command: default_speech_command(),
            args: Vec::new(),
        }
    }
}

/// External speech-to-text command that prints one transcript on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}
