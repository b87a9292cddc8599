use lb_core::{
    file_utils, IntoIoError, IntoJsonError, JsonFileError, APP_VERSION_NAME,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::update::VersionInfo;

pub const DEFAULT_SERVER_URL: &str = "https://account.lightbox-viewer.net";

/// Global Lightbox configuration stored in `<app dir>/config.json`.
///
/// # Why `Option`?
///
/// Most fields are `Option`s for backwards compatibility: when upgrading
/// from an older version, `serde` deserializes missing fields as `None`,
/// which is treated as the default.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AppConfig {
    /// Username last used to log in. The token, if remembered,
    /// lives in the system keyring, never here.
    pub username: String,

    /// The version the app was last opened with.
    pub version: Option<String>,

    /// Account-server override, mainly for self-hosted setups.
    pub server_url: Option<String>,

    /// Whether to keep the view history across sessions.
    /// `false` clears it at window close instead.
    pub save_history_on_exit: Option<bool>,

    /// Remember the session token in the keyring after a login.
    pub remember_login: Option<bool>,

    /// Cached result of the last update check.
    pub last_update_check: Option<VersionInfo>,

    /// Window geometry to restore on next open.
    pub window: Option<WindowProperties>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct WindowProperties {
    pub width: u32,
    pub height: u32,
    pub maximized: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            version: Some(APP_VERSION_NAME.to_owned()),
            server_url: None,
            save_history_on_exit: Some(true),
            remember_login: Some(false),
            last_update_check: None,
            window: None,
        }
    }
}

impl AppConfig {
    fn file_path() -> Result<PathBuf, JsonFileError> {
        Ok(file_utils::get_app_dir()?.join("config.json"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// doesn't exist yet.
    pub async fn load() -> Result<Self, JsonFileError> {
        let path = Self::file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = tokio::fs::read_to_string(&path).await.path(&path)?;
        let config = serde_json::from_str(&text).json(text)?;
        Ok(config)
    }

    /// Save the configuration atomically.
    pub async fn save(&self) -> Result<(), JsonFileError> {
        let path = Self::file_path()?;
        let text = serde_json::to_string_pretty(self).json(String::new())?;
        file_utils::write_atomic(&path, &text).await?;
        Ok(())
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn save_history_on_exit(&self) -> bool {
        self.save_history_on_exit.unwrap_or(true)
    }

    pub fn remember_login(&self) -> bool {
        self.remember_login.unwrap_or(false)
    }
}
