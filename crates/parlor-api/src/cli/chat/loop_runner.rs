//! The interactive chat loop.
//!
//! Reads lines with `ChatInput`, dispatches slash commands, and hands
//! everything else to the chat store. Output goes through the readline
//! shared writer so it never tears the prompt.

use std::io::Write;
use std::time::Duration;

use anyhow::{Result, anyhow};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use parlor_core::speech::player::SpeechPlayer;
use parlor_core::speech::recognizer::SpeechRecognizer;
use parlor_core::speech::synthesizer::SpeechSynthesizer;
use parlor_types::chat::ChatId;
use parlor_types::preferences::ModelSelector;
use tracing::{debug, warn};

use super::banner::{BannerInfo, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::view::TerminalView;
use crate::cli::history::chat_table;
use crate::state::{AppState, ConcreteChatStore};

type TerminalStore = ConcreteChatStore<TerminalView>;

/// What the loop does after a slash command.
enum Flow {
    Continue,
    Exit,
}

/// Run an interactive chat session until the user exits.
///
/// `chat_id` opens a specific chat; otherwise the last active chat (or a
/// fresh one) is shown.
pub async fn run_chat_loop(
    state: &AppState,
    chat_id: Option<String>,
    speak: bool,
    model: Option<ModelSelector>,
) -> Result<()> {
    state.spawn_voice_discovery();
    let preferences = state.preferences.load().await;

    let model_label = model.unwrap_or(state.config.default_model).label();
    let speech_label = if !state.synthesizer.is_available() {
        "unavailable"
    } else if speak || state.config.speech.enabled {
        "on (/speak to toggle)"
    } else {
        "off (/speak to toggle)"
    };
    print_welcome_banner(&BannerInfo {
        server_url: &state.config.server_url,
        model: model_label,
        speech: speech_label,
        voice_input: state.recognizer.is_available(),
    });

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, writer) =
        ChatInput::new(prompt).map_err(|e| anyhow!("Failed to initialize input: {e}"))?;
    let mut out = writer.clone();

    let view = TerminalView::with_writer(preferences, Box::new(writer));
    let mut store = state.chat_store(view, speak, model);

    let spinner = thinking_spinner("loading chats...");
    store.start().await;
    spinner.finish_and_clear();

    if let Some(id) = chat_id {
        open_chat(&mut store, &mut out, id).await;
    }

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                if store.speech().is_speaking() {
                    store.speech().cancel();
                    let _ = writeln!(out, "  {}", style("Stopped speaking.").dim());
                } else {
                    let _ = writeln!(
                        out,
                        "  {}",
                        style("Press Ctrl+D to exit, or keep chatting.").dim()
                    );
                }
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match handle_command(state, &mut store, &mut chat_input, &mut out, cmd).await {
                        Flow::Continue => continue,
                        Flow::Exit => break,
                    }
                }

                send_message(&mut store, &text).await;
            }
        }
    }

    store.speech().cancel();
    drop(chat_input);
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

async fn handle_command(
    state: &AppState,
    store: &mut TerminalStore,
    chat_input: &mut ChatInput,
    out: &mut impl Write,
    cmd: ChatCommand,
) -> Flow {
    match cmd {
        ChatCommand::Help => commands::print_help(out),
        ChatCommand::Clear => chat_input.clear(),
        ChatCommand::Exit => return Flow::Exit,
        ChatCommand::New => {
            let spinner = thinking_spinner("creating chat...");
            let result = store.create_chat().await;
            spinner.finish_and_clear();
            if let Err(e) = result {
                debug!(error = %e, "new chat not created");
            }
        }
        ChatCommand::Chats => {
            let entries = store.chat_list();
            if entries.is_empty() {
                let _ = writeln!(out, "  {}", style("No chats yet.").dim());
            } else {
                let _ = writeln!(out, "{}\n", chat_table(&entries));
            }
        }
        ChatCommand::Open(id) => open_chat(store, out, id).await,
        ChatCommand::Speak => {
            toggle_spoken_replies(store.speech(), out, &state.config.speech.command);
        }
        ChatCommand::Stop => store.speech().cancel(),
        ChatCommand::Model(None) => {
            let _ = writeln!(
                out,
                "  {} Current model: {}",
                style("*").cyan().bold(),
                style(store.model().label()).cyan()
            );
        }
        ChatCommand::Model(Some(model)) => {
            store.set_model(model);
            let _ = writeln!(
                out,
                "  {} Switched to {}",
                style("ok").green(),
                style(model.label()).cyan()
            );
        }
        ChatCommand::Upload(path) => match parlor_infra::filesystem::read_upload(&path).await {
            Ok(upload) => {
                let spinner = thinking_spinner(&format!("uploading {}...", upload.name));
                let result = store.upload_file(upload).await;
                spinner.finish_and_clear();
                if let Err(e) = result {
                    debug!(error = %e, "upload not sent");
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read upload");
                let _ = writeln!(
                    out,
                    "  {} Could not read {}: {e}",
                    style("!").red().bold(),
                    path.display()
                );
            }
        },
        ChatCommand::Voice => dictate(state, store, out).await,
        ChatCommand::Theme => match state.preferences.toggle_theme().await {
            Ok(theme) => {
                store.view_mut().set_theme(theme);
                let _ = writeln!(out, "  {} Theme: {theme}", style("ok").green());
            }
            Err(e) => {
                warn!(error = %e, "failed to save theme");
                let _ = writeln!(out, "  {} Could not save theme: {e}", style("!").red().bold());
            }
        },
        ChatCommand::Sidebar => match state.preferences.toggle_sidebar().await {
            Ok(collapsed) => {
                store.view_mut().set_sidebar_collapsed(collapsed);
                if collapsed {
                    let _ = writeln!(out, "  {} Chat list hidden", style("ok").green());
                } else {
                    store.render_chat_list();
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to save sidebar state");
                let _ = writeln!(
                    out,
                    "  {} Could not save sidebar state: {e}",
                    style("!").red().bold()
                );
            }
        },
        ChatCommand::Invalid(message) => {
            let _ = writeln!(out, "  {} {message}", style("!").yellow().bold());
        }
        ChatCommand::Unknown(name) => {
            let _ = writeln!(
                out,
                "  {} Unknown command: {}. Type /help for available commands.",
                style("?").yellow().bold(),
                style(name).dim()
            );
        }
    }
    Flow::Continue
}

/// Flip spoken replies for future bot messages. A reply already being
/// spoken keeps playing; `/stop` and Ctrl+C cut it off.
fn toggle_spoken_replies<S: SpeechSynthesizer>(
    speech: &SpeechPlayer<S>,
    out: &mut impl Write,
    command: &str,
) -> bool {
    let enabled = speech.toggle();
    let _ = writeln!(
        out,
        "  {} Spoken replies {}",
        style("*").cyan().bold(),
        if enabled { "on" } else { "off" }
    );
    if enabled && !speech.synthesizer().is_available() {
        let _ = writeln!(
            out,
            "  {} Speech command '{command}' not found; nothing will be spoken.",
            style("!").yellow().bold(),
        );
    }
    enabled
}

async fn open_chat(store: &mut TerminalStore, out: &mut impl Write, id: String) {
    let id = ChatId::from(id);
    if store.state().histories().contains(&id) {
        store.select_chat(id).await;
    } else {
        let _ = writeln!(
            out,
            "  {} No chat with id {}. Type /chats to list them.",
            style("!").yellow().bold(),
            style(id.as_str()).dim()
        );
    }
}

async fn send_message(store: &mut TerminalStore, text: &str) {
    let spinner = thinking_spinner(&format!("asking {}...", store.model().label()));
    let result = store.send_user_message(text).await;
    spinner.finish_and_clear();
    if let Err(e) = result {
        debug!(error = %e, "message not sent");
    }
}

/// Listen once and send the transcript as if it had been typed.
async fn dictate(state: &AppState, store: &mut TerminalStore, out: &mut impl Write) {
    if !state.recognizer.is_available() {
        let _ = writeln!(
            out,
            "  {} Voice input is not configured (add [recognition] to config.toml).",
            style("!").yellow().bold()
        );
        return;
    }

    store.speech().cancel();
    let spinner = thinking_spinner("listening...");
    let result = state.recognizer.recognize().await;
    spinner.finish_and_clear();

    match result {
        Ok(Some(transcript)) => send_message(store, &transcript).await,
        Ok(None) => {
            let _ = writeln!(out, "  {}", style("No speech detected.").dim());
        }
        Err(e) => {
            warn!(error = %e, "voice input failed");
            let _ = writeln!(out, "  {} Voice input failed: {e}", style("!").red().bold());
        }
    }
}

fn thinking_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_types::error::SpeechError;
    use parlor_types::speech::{Utterance, Voice};
    use std::sync::Arc;

    /// Never finishes an utterance, so playback stays in progress.
    struct EndlessSynthesizer {
        available: bool,
    }

    impl SpeechSynthesizer for EndlessSynthesizer {
        fn is_available(&self) -> bool {
            self.available
        }

        fn voices(&self) -> Vec<Voice> {
            Vec::new()
        }

        async fn speak(&self, _utterance: Utterance) -> Result<(), SpeechError> {
            std::future::pending().await
        }

        fn cancel(&self) {}
    }

    #[tokio::test]
    async fn test_toggle_off_keeps_current_reply_playing() {
        let player = SpeechPlayer::new(Arc::new(EndlessSynthesizer { available: true }));
        player.set_enabled(true);
        assert_eq!(player.speak("a reply being read aloud"), 1);
        assert!(player.is_speaking());

        let mut out = Vec::new();
        assert!(!toggle_spoken_replies(&player, &mut out, "espeak"));

        assert!(!player.is_enabled());
        assert!(player.is_speaking());
        assert!(String::from_utf8(out).unwrap().contains("Spoken replies off"));

        player.cancel();
        assert!(!player.is_speaking());
    }

    #[tokio::test]
    async fn test_toggle_on_warns_when_backend_missing() {
        let player = SpeechPlayer::new(Arc::new(EndlessSynthesizer { available: false }));

        let mut out = Vec::new();
        assert!(toggle_spoken_replies(&player, &mut out, "espeak"));

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Spoken replies on"));
        assert!(printed.contains("'espeak' not found"));
    }
}
