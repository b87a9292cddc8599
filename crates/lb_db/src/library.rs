//! The primary library store: folders and media files.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;

use crate::{now_rfc3339, open_pool, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS media_folders (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    path      TEXT NOT NULL UNIQUE,
    added_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS media_files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    folder_id   INTEGER REFERENCES media_folders(id),
    path        TEXT NOT NULL UNIQUE,
    file_name   TEXT NOT NULL,
    size_bytes  INTEGER NOT NULL,
    width       INTEGER,
    height      INTEGER,
    sha256      TEXT NOT NULL,
    missing     INTEGER NOT NULL DEFAULT 0,
    added_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_media_files_folder ON media_files(folder_id);
CREATE INDEX IF NOT EXISTS idx_media_files_sha256 ON media_files(sha256);
";

/// A registered media folder.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaFolder {
    pub id: i64,
    pub path: String,
    pub added_at: String,
}

/// One imported media file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MediaFile {
    pub id: i64,
    pub folder_id: Option<i64>,
    pub path: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub sha256: String,
    /// Set when a sync pass finds the file gone from disk.
    pub missing: bool,
    pub added_at: String,
}

/// Everything known about a file before it gets a row.
#[derive(Debug, Clone)]
pub struct NewMediaFile {
    pub folder_id: Option<i64>,
    pub path: String,
    pub file_name: String,
    pub size_bytes: i64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub sha256: String,
}

/// Cloning shares the underlying pool, so background workers can hold a
/// handle while the window keeps ownership of the lifecycle.
#[derive(Clone)]
pub struct Library {
    pool: SqlitePool,
    path: PathBuf,
}

impl Library {
    /// Open (or create) `library.db` under `dir` in WAL mode.
    pub async fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join("library.db");
        let pool = open_pool(&path).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool, path })
    }

    pub async fn insert_folder(&self, folder_path: &str) -> Result<MediaFolder, StoreError> {
        if let Some(existing) = self.folder_by_path(folder_path).await? {
            return Ok(existing);
        }
        sqlx::query("INSERT INTO media_folders (path, added_at) VALUES (?, ?)")
            .bind(folder_path)
            .bind(now_rfc3339())
            .execute(&self.pool)
            .await?;
        match self.folder_by_path(folder_path).await? {
            Some(folder) => Ok(folder),
            None => Err(StoreError::Sqlx(sqlx::Error::RowNotFound)),
        }
    }

    pub async fn folder_by_path(
        &self,
        folder_path: &str,
    ) -> Result<Option<MediaFolder>, StoreError> {
        let folder =
            sqlx::query_as::<_, MediaFolder>("SELECT * FROM media_folders WHERE path = ?")
                .bind(folder_path)
                .fetch_optional(&self.pool)
                .await?;
        Ok(folder)
    }

    pub async fn folders(&self) -> Result<Vec<MediaFolder>, StoreError> {
        let folders =
            sqlx::query_as::<_, MediaFolder>("SELECT * FROM media_folders ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(folders)
    }

    pub async fn file_by_path(&self, file_path: &str) -> Result<Option<MediaFile>, StoreError> {
        let file = sqlx::query_as::<_, MediaFile>("SELECT * FROM media_files WHERE path = ?")
            .bind(file_path)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file)
    }

    pub async fn insert_file(&self, new: NewMediaFile) -> Result<MediaFile, StoreError> {
        sqlx::query(
            "INSERT INTO media_files
                (folder_id, path, file_name, size_bytes, width, height, sha256, missing, added_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(new.folder_id)
        .bind(&new.path)
        .bind(&new.file_name)
        .bind(new.size_bytes)
        .bind(new.width)
        .bind(new.height)
        .bind(&new.sha256)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;

        match self.file_by_path(&new.path).await? {
            Some(file) => Ok(file),
            None => Err(StoreError::Sqlx(sqlx::Error::RowNotFound)),
        }
    }

    /// Flip the missing flag, e.g. when a sync pass notices a file
    /// disappeared (or came back).
    pub async fn set_missing(&self, file_id: i64, missing: bool) -> Result<(), StoreError> {
        sqlx::query("UPDATE media_files SET missing = ? WHERE id = ?")
            .bind(missing)
            .bind(file_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn files_in_folder(&self, folder_id: i64) -> Result<Vec<MediaFile>, StoreError> {
        let files = sqlx::query_as::<_, MediaFile>(
            "SELECT * FROM media_files WHERE folder_id = ? ORDER BY path",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(files)
    }

    pub async fn file_count(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM media_files")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// WAL checkpoint, then close. Consumes the store; shutdown calls this
    /// exactly once.
    pub async fn checkpoint_and_close(self) -> Result<(), StoreError> {
        crate::checkpoint_and_close(self.pool, &self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_library() -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path()).await.unwrap();
        (dir, library)
    }

    fn sample_file(path: &str, folder_id: Option<i64>) -> NewMediaFile {
        NewMediaFile {
            folder_id,
            path: path.to_owned(),
            file_name: path.rsplit('/').next().unwrap_or(path).to_owned(),
            size_bytes: 123,
            width: Some(640),
            height: Some(480),
            sha256: "deadbeef".to_owned(),
        }
    }

    #[tokio::test]
    async fn inserting_and_looking_up_files() {
        let (_dir, library) = temp_library().await;

        let folder = library.insert_folder("/pics").await.unwrap();
        let file = library
            .insert_file(sample_file("/pics/cat.jpg", Some(folder.id)))
            .await
            .unwrap();
        assert_eq!(file.file_name, "cat.jpg");
        assert!(!file.missing);

        let found = library.file_by_path("/pics/cat.jpg").await.unwrap();
        assert_eq!(found.map(|f| f.id), Some(file.id));
        assert_eq!(library.file_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn folder_insert_is_idempotent() {
        let (_dir, library) = temp_library().await;
        let a = library.insert_folder("/pics").await.unwrap();
        let b = library.insert_folder("/pics").await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(library.folders().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_flag_round_trips() {
        let (_dir, library) = temp_library().await;
        let file = library
            .insert_file(sample_file("/pics/dog.png", None))
            .await
            .unwrap();

        library.set_missing(file.id, true).await.unwrap();
        let reread = library
            .file_by_path("/pics/dog.png")
            .await
            .unwrap()
            .unwrap();
        assert!(reread.missing);
    }

    #[tokio::test]
    async fn checkpoint_and_close_truncates_wal() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path()).await.unwrap();
        library
            .insert_file(sample_file("/pics/a.jpg", None))
            .await
            .unwrap();

        lb_core::print::set_print(false);
        library.checkpoint_and_close().await.unwrap();

        // After a TRUNCATE checkpoint the -wal file is empty (or gone).
        let wal = dir.path().join("library.db-wal");
        if wal.exists() {
            assert_eq!(std::fs::metadata(&wal).unwrap().len(), 0);
        }
    }
}
