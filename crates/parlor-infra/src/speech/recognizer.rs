//! CommandRecognizer -- [`SpeechRecognizer`] over an external command.
//!
//! The command records one utterance and prints the transcript on stdout.

use std::process::Stdio;

use parlor_core::speech::recognizer::SpeechRecognizer;
use parlor_types::config::RecognitionConfig;
use parlor_types::error::RecognitionError;
use tokio::process::Command;
use tracing::debug;

use super::find_executable;

/// One-shot speech-to-text through a configured command.
///
/// Built from an optional [`RecognitionConfig`]; without one every
/// `recognize` call reports [`RecognitionError::Unavailable`].
pub struct CommandRecognizer {
    config: Option<RecognitionConfig>,
}

impl CommandRecognizer {
    pub fn new(config: Option<RecognitionConfig>) -> Self {
        Self { config }
    }

    /// Whether a recognition command is configured and installed.
    pub fn is_available(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|c| find_executable(&c.command).is_some())
    }
}

impl SpeechRecognizer for CommandRecognizer {
    async fn recognize(&self) -> Result<Option<String>, RecognitionError> {
        let config = self.config.as_ref().ok_or(RecognitionError::Unavailable)?;

        let output = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| RecognitionError::Failed(format!("failed to start {}: {e}", config.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Failed(format!(
                "{} exited with {}: {}",
                config.command,
                output.status,
                stderr.trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = transcript.len(), "speech recognized");
        Ok((!transcript.is_empty()).then_some(transcript))
    }
}
