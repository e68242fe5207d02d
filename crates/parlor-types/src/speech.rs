//! Speech synthesis types: voices and utterances.

use serde::{Deserialize, Serialize};

/// Default maximum characters per spoken chunk.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 100;

/// Playback rate applied to every utterance.
pub const DEFAULT_RATE: f32 = 1.0;

/// Playback pitch applied to every utterance.
pub const DEFAULT_PITCH: f32 = 1.0;

/// Playback volume applied to every utterance.
pub const DEFAULT_VOLUME: f32 = 1.0;

/// A voice offered by the synthesis backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Backend-specific identifier passed back when speaking.
    pub id: String,
    /// Human-readable voice name.
    pub name: String,
    /// BCP-47 style language tag, e.g. `en-US`.
    pub lang: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lang: lang.into(),
        }
    }

    /// Whether the language tag is a regional English variant (`en-*`).
    pub fn is_english(&self) -> bool {
        self.lang
            .get(..3)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("en-"))
    }
}

/// One request to the synthesis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<Voice>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    /// An utterance with the fixed default rate, pitch and volume.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice: None,
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
            volume: DEFAULT_VOLUME,
        }
    }

    pub fn with_voice(mut self, voice: Option<Voice>) -> Self {
        self.voice = voice;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_english() {
        assert!(Voice::new("a", "Samantha", "en-US").is_english());
        assert!(Voice::new("b", "Daniel", "EN-gb").is_english());
        assert!(!Voice::new("c", "Thomas", "fr-FR").is_english());
        // Bare "en" has no region and does not qualify.
        assert!(!Voice::new("d", "Generic", "en").is_english());
    }

    #[test]
    fn test_utterance_defaults() {
        let u = Utterance::new("hello");
        assert_eq!(u.rate, 1.0);
        assert_eq!(u.pitch, 1.0);
        assert_eq!(u.volume, 1.0);
        assert!(u.voice.is_none());
    }
}
