//! Spoken playback of bot replies and optional voice input.
//!
//! `SpeechPlayer` splits text into bounded chunks and plays them one after
//! another through a `SpeechSynthesizer`. `SpeechRecognizer` is the port for
//! a one-shot speech-to-text backend.

pub mod chunker;
pub mod player;
pub mod recognizer;
pub mod synthesizer;
pub mod voice;
