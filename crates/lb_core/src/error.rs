use std::path::{Path, PathBuf};

use thiserror::Error;

/// An IO error that remembers which path it happened at.
///
/// Produced through [`IntoIoError`], so call sites read as
/// `fs::read_to_string(&path).await.path(&path)?`.
#[derive(Debug, Error)]
#[error("at {}:\n{error}", path.display())]
pub struct IoError {
    pub error: std::io::Error,
    pub path: PathBuf,
}

/// A JSON decode error that carries the text that failed to parse.
#[derive(Debug, Error)]
#[error("could not parse JSON: {error}")]
pub struct JsonError {
    pub error: serde_json::Error,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors from talking to a remote HTTP endpoint.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("server returned {status} for {url}")]
    DownloadError {
        status: reqwest::StatusCode,
        url: reqwest::Url,
    },
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
}

pub trait IntoIoError<T> {
    /// Attach the path being operated on to an IO error.
    fn path(self, p: impl AsRef<Path>) -> Result<T, IoError>;
}

impl<T> IntoIoError<T> for Result<T, std::io::Error> {
    fn path(self, p: impl AsRef<Path>) -> Result<T, IoError> {
        self.map_err(|error: std::io::Error| IoError {
            error,
            path: p.as_ref().to_owned(),
        })
    }
}

pub trait IntoJsonError<T> {
    /// Attach the offending text to a JSON decode error.
    fn json(self, text: String) -> Result<T, JsonError>;
}

impl<T> IntoJsonError<T> for Result<T, serde_json::Error> {
    fn json(self, text: String) -> Result<T, JsonError> {
        self.map_err(|error: serde_json::Error| JsonError { error, text })
    }
}
