//! SpeechSynthesizer trait definition.

use parlor_types::error::SpeechError;
use parlor_types::speech::{Utterance, Voice};

/// Text-to-speech backend driven by `SpeechPlayer`.
///
/// `speak` resolves when the backend signals the end of the utterance
/// (`Ok`) or an error (`Err`). Dropping the future abandons the utterance.
/// Implementations live in parlor-infra (e.g., `CommandSynthesizer`).
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Whether the backend can speak at all on this host.
    fn is_available(&self) -> bool;

    /// Currently known voices.
    ///
    /// May be empty until the backend has finished enumerating them;
    /// callers must tolerate an empty list.
    fn voices(&self) -> Vec<Voice>;

    /// Speak one utterance to completion.
    fn speak(
        &self,
        utterance: Utterance,
    ) -> impl std::future::Future<Output = Result<(), SpeechError>> + Send;

    /// Stop whatever is being spoken right now.
    fn cancel(&self);
}
