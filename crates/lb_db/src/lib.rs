//! SQLite stores for the Lightbox media library.
//!
//! Two separate databases, mirroring how the application owns them:
//! the primary library store ([`Library`], `library.db`) and the
//! feature-specific thumbnail store ([`ThumbStore`], `thumbs.db`).
//! Both run in WAL mode; at shutdown each one gets a
//! `wal_checkpoint(TRUNCATE)` and is closed, independently of the other.

use std::path::{Path, PathBuf};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use lb_core::pt;

mod library;
mod thumbs;

pub use library::{Library, MediaFile, MediaFolder, NewMediaFile};
pub use thumbs::{ThumbStore, Thumbnail};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] lb_core::IoError),
}

pub(crate) async fn open_pool(path: &Path) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Merge the write-ahead log back into the main file, then close the pool.
///
/// Called once per store during shutdown. Errors bubble up to the shutdown
/// report and go no further.
pub(crate) async fn checkpoint_and_close(
    pool: SqlitePool,
    path: &PathBuf,
) -> Result<(), StoreError> {
    sqlx::query("PRAGMA wal_checkpoint(TRUNCATE);")
        .execute(&pool)
        .await?;
    pool.close().await;
    pt!("Checkpointed and closed {}", path.display());
    Ok(())
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
