//! SpeechRecognizer trait definition.

use parlor_types::error::RecognitionError;

/// One-shot speech-to-text backend.
pub trait SpeechRecognizer: Send + Sync {
    /// Listen once and return the recognised transcript.
    ///
    /// `Ok(None)` means the session ended without any speech.
    fn recognize(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<String>, RecognitionError>> + Send;
}
