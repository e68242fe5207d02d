//! Filesystem helpers: data directory layout and reading files for upload.

use std::path::{Path, PathBuf};

use parlor_types::remote::FileUpload;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PARLOR_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `PARLOR_DATA_DIR` environment variable
/// 2. `~/.parlor`
/// 3. `.parlor` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".parlor");
    }

    PathBuf::from(".parlor")
}

/// Create the data directory if it does not exist.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

/// Read a local file into an upload, named after its final path component.
pub async fn read_upload(path: &Path) -> Result<FileUpload, std::io::Error> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", path.display()),
            )
        })?;
    let bytes = tokio::fs::read(path).await?;
    Ok(FileUpload { name, bytes })
}
