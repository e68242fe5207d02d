//! Speech adapters backed by external commands.
//!
//! `CommandSynthesizer` drives an espeak-ng compatible text-to-speech
//! command; `CommandRecognizer` runs a one-shot speech-to-text command and
//! reads the transcript from its stdout.

pub mod command;
pub mod recognizer;

use std::path::{Path, PathBuf};

/// Locate an executable by name on `PATH`, or accept it as given when it
/// already contains a path separator.
pub(crate) fn find_executable(command: &str) -> Option<PathBuf> {
    let candidate = Path::new(command);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(command))
        .find(|path| path.is_file())
}
