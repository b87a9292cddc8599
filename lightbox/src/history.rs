use std::path::{Path, PathBuf};

use lb_core::{file_utils, IntoIoError, IntoJsonError, IoError, JsonFileError};
use serde::{Deserialize, Serialize};

const MAX_ENTRIES: usize = 500;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistoryEntry {
    pub path: String,
    pub viewed_at: String,
}

/// Recently-viewed files. Whether this survives the session is the user's
/// call (`save_history_on_exit`): at window close it is either persisted to
/// `history.json` or cleared from disk.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ViewHistory {
    pub entries: Vec<HistoryEntry>,
}

impl ViewHistory {
    fn file_path() -> Result<PathBuf, JsonFileError> {
        Ok(file_utils::get_app_dir()?.join("history.json"))
    }

    pub async fn load() -> Result<Self, JsonFileError> {
        let path = Self::file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = tokio::fs::read_to_string(&path).await.path(&path)?;
        let history = serde_json::from_str(&text).json(text)?;
        Ok(history)
    }

    /// Record a viewed file, most recent first, capped at [`MAX_ENTRIES`].
    pub fn record(&mut self, path: &Path) {
        let key = path.to_string_lossy().into_owned();
        self.entries.retain(|e| e.path != key);
        self.entries.insert(
            0,
            HistoryEntry {
                path: key,
                viewed_at: chrono::Utc::now().to_rfc3339(),
            },
        );
        self.entries.truncate(MAX_ENTRIES);
    }

    pub async fn save(&self) -> Result<(), JsonFileError> {
        let path = Self::file_path()?;
        let text = serde_json::to_string_pretty(self).json(String::new())?;
        file_utils::write_atomic(&path, &text).await?;
        Ok(())
    }

    /// Remove the history file from disk. Used by the shutdown branch when
    /// the user opted out of keeping history.
    pub async fn clear_on_disk() -> Result<(), JsonFileError> {
        let path = Self::file_path()?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(IoError { error, path }.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_moves_duplicates_to_front() {
        let mut history = ViewHistory::default();
        history.record(Path::new("/pics/a.jpg"));
        history.record(Path::new("/pics/b.jpg"));
        history.record(Path::new("/pics/a.jpg"));

        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[0].path, "/pics/a.jpg");
        assert_eq!(history.entries[1].path, "/pics/b.jpg");
    }

    #[test]
    fn record_caps_length() {
        let mut history = ViewHistory::default();
        for i in 0..(MAX_ENTRIES + 50) {
            history.record(Path::new(&format!("/pics/{i}.jpg")));
        }
        assert_eq!(history.entries.len(), MAX_ENTRIES);
    }
}
