//! Shared foundation for the Lightbox media viewer.
//!
//! Contains the pieces every other crate leans on:
//! - error types and the `.path()` / `.json()` context traits ([`error`])
//! - the `info!` / `err!` / `pt!` logging macros ([`print`])
//! - app-directory and download helpers ([`file_utils`])
//! - the timed remote operation primitive ([`timed`])
//! - the ordered shutdown sequence ([`shutdown`])
//! - the observer registry with symmetric unsubscribe ([`observe`])

use std::sync::LazyLock;

mod error;
pub mod file_utils;
pub mod observe;
pub mod print;
pub mod shutdown;
pub mod timed;

pub use error::{
    IntoIoError, IntoJsonError, IoError, JsonError, JsonFileError, RequestError,
};

pub const APP_NAME: &str = "Lightbox";
pub const APP_VERSION_NAME: &str = env!("CARGO_PKG_VERSION");

/// Shared HTTP client. Building a `reqwest::Client` is expensive,
/// so everything network-facing clones this one.
pub static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(format!("{APP_NAME}/{APP_VERSION_NAME}"))
        .build()
        .unwrap_or_default()
});
