//! Paths and small filesystem/network helpers.

use std::path::{Path, PathBuf};

use crate::{IntoIoError, IoError, RequestError};

/// Get the Lightbox data directory, creating it if missing.
///
/// - Linux: `~/.local/share/Lightbox`
/// - Windows: `%APPDATA%/Lightbox`
/// - macOS: `~/Library/Application Support/Lightbox`
pub fn get_app_dir() -> Result<PathBuf, IoError> {
    let base = dirs::data_dir().ok_or_else(|| IoError {
        error: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not resolve a data directory for this platform",
        ),
        path: PathBuf::from("."),
    })?;

    let dir = base.join(crate::APP_NAME);
    std::fs::create_dir_all(&dir).path(&dir)?;
    Ok(dir)
}

/// Write a file through a temporary sibling and rename it into place,
/// so a crash mid-write never leaves a truncated file behind.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), IoError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, contents).await.path(&tmp)?;
    tokio::fs::rename(&tmp, path).await.path(path)?;
    Ok(())
}

/// Error out on non-2xx responses.
pub fn check_for_success(response: &reqwest::Response) -> Result<(), RequestError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(RequestError::DownloadError {
            status: response.status(),
            url: response.url().clone(),
        })
    }
}

/// GET a URL and return the body as a string.
pub async fn download_to_string(url: &str) -> Result<String, RequestError> {
    let response = crate::CLIENT.get(url).send().await?;
    check_for_success(&response)?;
    Ok(response.text().await?)
}
