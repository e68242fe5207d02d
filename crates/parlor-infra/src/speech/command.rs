//! CommandSynthesizer -- [`SpeechSynthesizer`] over an espeak-ng style CLI.
//!
//! Each utterance runs one child process that reads the text from stdin.
//! `cancel` interrupts the utterance in flight; dropping the `speak` future
//! kills the child as well.

use std::process::Stdio;
use std::sync::RwLock;

use parlor_core::speech::synthesizer::SpeechSynthesizer;
use parlor_types::config::SpeechConfig;
use parlor_types::error::SpeechError;
use parlor_types::speech::{Utterance, Voice};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Notify;
use tracing::{debug, warn};

use super::find_executable;

/// espeak-ng defaults the utterance multipliers are applied to.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
const BASE_PITCH: f32 = 50.0;
const BASE_AMPLITUDE: f32 = 100.0;

/// Text-to-speech through an external command.
pub struct CommandSynthesizer {
    command: String,
    args: Vec<String>,
    available: bool,
    voices: RwLock<Vec<Voice>>,
    interrupt: Notify,
}

impl CommandSynthesizer {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let command = command.into();
        let available = find_executable(&command).is_some();
        if !available {
            debug!(command = %command, "speech command not found, playback unavailable");
        }
        Self {
            command,
            args,
            available,
            voices: RwLock::new(Vec::new()),
            interrupt: Notify::new(),
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Enumerate voices with `<command> --voices` and cache them.
    ///
    /// Until this completes `voices()` returns an empty list.
    pub async fn load_voices(&self) -> Result<usize, SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable);
        }
        let output = Command::new(&self.command)
            .args(&self.args)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("failed to list voices: {e}")))?;

        if !output.status.success() {
            return Err(SpeechError::Synthesis(format!(
                "voice listing exited with {}",
                output.status
            )));
        }

        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        let count = voices.len();
        *self
            .voices
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = voices;
        debug!(count, "speech voices loaded");
        Ok(count)
    }

    fn command_for(&self, utterance: &Utterance) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .args(utterance_args(utterance))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

/// Flags for one utterance, scaled from the espeak-ng defaults.
fn utterance_args(utterance: &Utterance) -> Vec<String> {
    let mut args = Vec::with_capacity(9);
    if let Some(voice) = &utterance.voice {
        args.push("-v".to_string());
        args.push(voice.id.clone());
    }
    args.push("-s".to_string());
    args.push(format!("{}", (BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32));
    args.push("-p".to_string());
    args.push(format!("{}", (BASE_PITCH * utterance.pitch).round().clamp(0.0, 99.0) as u32));
    args.push("-a".to_string());
    args.push(format!("{}", (BASE_AMPLITUDE * utterance.volume).round().clamp(0.0, 200.0) as u32));
    args.push("--stdin".to_string());
    args
}

/// Parse `espeak-ng --voices` output.
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  en-us           --/F      English_(America)  gmw/en-US            (en 10)
/// ```
///
/// Female voices get a "Female" suffix so name-based preferences can see
/// the gender.
fn parse_voice_list(output: &str) -> Vec<Voice> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let lang = cols.next()?;
            let gender = cols.next()?;
            let name = cols.next()?.replace('_', " ");
            let name = if gender.ends_with('F') {
                format!("{name} Female")
            } else {
                name
            };
            Some(Voice::new(lang, name, lang))
        })
        .collect()
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    async fn speak(&self, utterance: Utterance) -> Result<(), SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable);
        }

        let interrupted = self.interrupt.notified();
        tokio::pin!(interrupted);
        interrupted.as_mut().enable();

        let mut child = self
            .command_for(&utterance)
            .spawn()
            .map_err(|e| SpeechError::Synthesis(format!("failed to start {}: {e}", self.command)))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(utterance.text.as_bytes()).await {
                // The command may exit without reading its input.
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    warn!(error = %e, "failed to write utterance to speech command");
                }
            }
        }

        tokio::select! {
            () = &mut interrupted => {
                if let Err(e) = child.kill().await {
                    debug!(error = %e, "speech command already exited");
                }
                Err(SpeechError::Interrupted)
            }
            status = child.wait() => {
                let status = status.map_err(|e| SpeechError::Synthesis(e.to_string()))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(SpeechError::Synthesis(format!("{} exited with {status}", self.command)))
                }
            }
        }
    }

    fn cancel(&self) {
        self.interrupt.notify_waiters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn shell(script: &str) -> CommandSynthesizer {
        CommandSynthesizer::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_utterance_args_defaults() {
        let args = utterance_args(&Utterance::new("hello"));
        assert_eq!(args, vec!["-s", "175", "-p", "50", "-a", "100", "--stdin"]);
    }

    #[test]
    fn test_utterance_args_with_voice() {
        let utterance = Utterance::new("hello").with_voice(Some(Voice::new("en-us", "English", "en-us")));
        let args = utterance_args(&utterance);
        assert_eq!(&args[..2], &["-v", "en-us"]);
    }

    #[test]
    fn test_parse_voice_list() {
        let output = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 5  en-us           --/F      English_(America)  gmw/en-US            (en 10)
 5  en-gb           --/M      English_(Great_Britain) gmw/en           (en 2)
";
        let voices = parse_voice_list(output);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].id, "en-us");
        assert_eq!(voices[1].name, "English (America) Female");
        assert!(voices[1].is_english());
        assert!(!voices[0].is_english());
        assert_eq!(voices[2].name, "English (Great Britain)");
    }

    #[test]
    fn test_missing_command_is_unavailable() {
        let synth = CommandSynthesizer::new("parlor-no-such-tts", Vec::new());
        assert!(!synth.is_available());
        assert!(synth.voices().is_empty());
    }

    #[tokio::test]
    async fn test_speak_succeeds_when_command_exits_cleanly() {
        let synth = shell("cat >/dev/null");
        synth.speak(Utterance::new("hello there")).await.unwrap();
    }

    #[tokio::test]
    async fn test_speak_reports_failed_exit() {
        let synth = shell("exit 3");
        let err = synth.speak(Utterance::new("hello")).await.unwrap_err();
        assert!(matches!(err, SpeechError::Synthesis(_)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_utterance() {
        let synth = Arc::new(shell("sleep 5"));
        let task = {
            let synth = Arc::clone(&synth);
            tokio::spawn(async move { synth.speak(Utterance::new("long")).await })
        };

        tokio::time::sleep(Duration::from_millis(200)).await;
        synth.cancel();

        let result = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(result, Err(SpeechError::Interrupted));
    }

    #[tokio::test]
    async fn test_load_voices_from_command_output() {
        let synth = shell(
            "printf 'Pty Language Age/Gender VoiceName File\\n 5 en-us --/F Samantha gmw/en-US\\n'",
        );
        assert_eq!(synth.load_voices().await.unwrap(), 1);
        assert_eq!(synth.voices()[0].name, "Samantha Female");
    }
}
