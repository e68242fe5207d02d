//! Sequential chunked playback with a single active queue.
//!
//! `SpeechPlayer::speak` replaces whatever is playing with a new queue of
//! chunks. Each queue runs on its own task and owns a cancellation token;
//! starting a new queue or calling `cancel` trips the token so a superseded
//! task never touches the shared state again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use parlor_types::speech::{DEFAULT_MAX_CHUNK_LEN, Utterance};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::chunker::split_into_chunks;
use super::synthesizer::SpeechSynthesizer;
use super::voice::select_voice;

struct Playback {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

struct PlaybackState {
    speaking: watch::Sender<bool>,
    current: Mutex<Option<Playback>>,
}

impl PlaybackState {
    /// Clear the speaking flag if `token` still owns the player.
    fn finish(&self, token: &CancellationToken) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if token.is_cancelled() {
            return;
        }
        self.speaking.send_replace(false);
        *current = None;
    }
}

/// Plays text through a `SpeechSynthesizer`, one chunk at a time.
///
/// At most one queue is active. The "speaking" signal is observable through
/// [`is_speaking`](Self::is_speaking) or a [`subscribe`](Self::subscribe)d
/// receiver. Must be used inside a tokio runtime.
pub struct SpeechPlayer<S: SpeechSynthesizer> {
    synth: Arc<S>,
    enabled: AtomicBool,
    max_chunk_len: usize,
    state: Arc<PlaybackState>,
}

impl<S: SpeechSynthesizer> SpeechPlayer<S> {
    pub fn new(synth: Arc<S>) -> Self {
        Self::with_max_chunk_len(synth, DEFAULT_MAX_CHUNK_LEN)
    }

    pub fn with_max_chunk_len(synth: Arc<S>, max_chunk_len: usize) -> Self {
        let (speaking, _) = watch::channel(false);
        Self {
            synth,
            enabled: AtomicBool::new(false),
            max_chunk_len,
            state: Arc::new(PlaybackState {
                speaking,
                current: Mutex::new(None),
            }),
        }
    }

    /// Speak `text`, interrupting any playback in progress.
    ///
    /// Returns the number of chunks queued. Nothing happens (and 0 is
    /// returned) when playback is disabled or the backend is unavailable.
    /// Text that yields no chunks still stops the previous queue.
    pub fn speak(&self, text: &str) -> usize {
        if !self.is_enabled() || !self.synth.is_available() {
            return 0;
        }

        let mut current = self.state.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = current.take() {
            previous.token.cancel();
            self.synth.cancel();
            debug!("interrupted previous speech queue");
        }

        let chunks = split_into_chunks(text, self.max_chunk_len);
        if chunks.is_empty() {
            self.state.speaking.send_replace(false);
            return 0;
        }
        let count = chunks.len();

        let token = CancellationToken::new();
        self.state.speaking.send_replace(true);

        let synth = Arc::clone(&self.synth);
        let state = Arc::clone(&self.state);
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            for (index, chunk) in chunks.into_iter().enumerate() {
                let voice = select_voice(&synth.voices()).cloned();
                let utterance = Utterance::new(chunk).with_voice(voice);

                let result = tokio::select! {
                    biased;
                    () = task_token.cancelled() => return,
                    r = synth.speak(utterance) => r,
                };

                if let Err(e) = result {
                    if !task_token.is_cancelled() {
                        warn!(chunk = index, error = %e, "speech synthesis failed, abandoning queue");
                    }
                    state.finish(&task_token);
                    return;
                }
            }
            state.finish(&task_token);
        });

        *current = Some(Playback { token, handle });
        debug!(chunks = count, "speech queue started");
        count
    }

    /// Stop playback immediately and discard the remaining queue.
    pub fn cancel(&self) {
        let mut current = self.state.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(playback) = current.take() {
            playback.token.cancel();
            playback.handle.abort();
            self.synth.cancel();
        }
        self.state.speaking.send_replace(false);
    }

    /// Whether future bot messages should be spoken.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Does not affect playback already in progress.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Flip the enabled flag and return the new value.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_speaking(&self) -> bool {
        *self.state.speaking.borrow()
    }

    /// Receiver for the "currently speaking" signal.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.speaking.subscribe()
    }

    /// Resolve once nothing is being spoken.
    pub async fn wait_idle(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|speaking| !*speaking).await;
    }

    pub fn synthesizer(&self) -> &Arc<S> {
        &self.synth
    }
}

impl<S: SpeechSynthesizer> Drop for SpeechPlayer<S> {
    fn drop(&mut self) {
        let mut current = self.state.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(playback) = current.take() {
            playback.token.cancel();
            playback.handle.abort();
        }
    }
}
