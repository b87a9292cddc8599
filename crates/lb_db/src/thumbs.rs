//! The thumbnail store, kept in its own database file so the cache can be
//! wiped without touching the library.

use std::path::{Path, PathBuf};

use sqlx::SqlitePool;

use crate::{now_rfc3339, open_pool, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS thumbnails (
    file_id     INTEGER PRIMARY KEY,
    width       INTEGER NOT NULL,
    height      INTEGER NOT NULL,
    data        BLOB NOT NULL,
    created_at  TEXT NOT NULL
);
";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Thumbnail {
    pub file_id: i64,
    pub width: i64,
    pub height: i64,
    pub data: Vec<u8>,
    pub created_at: String,
}

#[derive(Clone)]
pub struct ThumbStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl ThumbStore {
    /// Open (or create) `thumbs.db` under `dir` in WAL mode.
    pub async fn open(dir: &Path) -> Result<Self, StoreError> {
        let path = dir.join("thumbs.db");
        let pool = open_pool(&path).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool, path })
    }

    pub async fn put(
        &self,
        file_id: i64,
        width: i64,
        height: i64,
        data: &[u8],
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO thumbnails (file_id, width, height, data, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(file_id)
        .bind(width)
        .bind(height)
        .bind(data)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, file_id: i64) -> Result<Option<Thumbnail>, StoreError> {
        let thumb =
            sqlx::query_as::<_, Thumbnail>("SELECT * FROM thumbnails WHERE file_id = ?")
                .bind(file_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(thumb)
    }

    /// WAL checkpoint, then close. Consumes the store.
    pub async fn checkpoint_and_close(self) -> Result<(), StoreError> {
        crate::checkpoint_and_close(self.pool, &self.path).await
    }
}
