use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use lb_core::{info, pt, IntoIoError};
use lb_db::{Library, MediaFile, MediaFolder, NewMediaFile, StoreError};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "ico"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "webm", "avi", "mov"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Io(#[from] lb_core::IoError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("not a supported media file: {}", .0.display())]
    Unsupported(PathBuf),

    #[error("not a folder: {}", .0.display())]
    NotAFolder(PathBuf),
}

/// Result of importing one folder.
#[derive(Debug)]
pub struct FolderImport {
    pub folder: MediaFolder,
    pub new_files: Vec<MediaFile>,
    /// Files that were already in the library and got skipped.
    pub existing_files: usize,
}

/// Result of a sync pass over every registered folder.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncSummary {
    pub folders: usize,
    pub added: usize,
    /// Library entries whose file is gone from disk.
    pub went_missing: usize,
    /// Previously-missing entries whose file reappeared.
    pub restored: usize,
}

pub fn is_supported(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Import a single file picked by the user.
///
/// Returns `Ok(None)` when the file is already in the library
/// (matched by canonical path).
pub async fn import_file(
    library: &Library,
    path: &Path,
) -> Result<Option<MediaFile>, ImportError> {
    if !is_supported(path) {
        return Err(ImportError::Unsupported(path.to_owned()));
    }
    let canonical = tokio::fs::canonicalize(path).await.path(path)?;
    let key = canonical.to_string_lossy().into_owned();

    if library.file_by_path(&key).await?.is_some() {
        return Ok(None);
    }

    let new = probe(&canonical, None).await?;
    let file = library.insert_file(new).await?;
    pt!("Imported {}", file.file_name);
    Ok(Some(file))
}

/// Register a folder and import every supported file inside it.
pub async fn import_folder(library: &Library, path: &Path) -> Result<FolderImport, ImportError> {
    let canonical = tokio::fs::canonicalize(path).await.path(path)?;
    if !canonical.is_dir() {
        return Err(ImportError::NotAFolder(canonical));
    }

    let folder = library
        .insert_folder(&canonical.to_string_lossy())
        .await?;
    info!("Importing folder {}", canonical.display());

    let mut new_files = Vec::new();
    let mut existing_files = 0;

    for entry_path in walk_supported(&canonical) {
        let key = entry_path.to_string_lossy().into_owned();
        if library.file_by_path(&key).await?.is_some() {
            existing_files += 1;
            continue;
        }
        let new = probe(&entry_path, Some(folder.id)).await?;
        new_files.push(library.insert_file(new).await?);
    }

    info!(
        "Folder import done: {} new, {existing_files} already known",
        new_files.len()
    );
    Ok(FolderImport {
        folder,
        new_files,
        existing_files,
    })
}

/// Re-walk every registered folder: pick up files that appeared, flag
/// library entries whose file disappeared, and un-flag ones that came back.
pub async fn sync_all_folders(library: &Library) -> Result<SyncSummary, ImportError> {
    let folders = library.folders().await?;
    let mut summary = SyncSummary {
        folders: folders.len(),
        ..Default::default()
    };

    for folder in folders {
        let folder_path = PathBuf::from(&folder.path);
        let on_disk: Vec<PathBuf> = walk_supported(&folder_path);

        let known = library.files_in_folder(folder.id).await?;

        for file in &known {
            let exists = Path::new(&file.path).exists();
            if file.missing && exists {
                library.set_missing(file.id, false).await?;
                summary.restored += 1;
            } else if !file.missing && !exists {
                library.set_missing(file.id, true).await?;
                summary.went_missing += 1;
            }
        }

        for entry_path in on_disk {
            let key = entry_path.to_string_lossy().into_owned();
            if library.file_by_path(&key).await?.is_none() {
                let new = probe(&entry_path, Some(folder.id)).await?;
                library.insert_file(new).await?;
                summary.added += 1;
            }
        }
    }

    info!(
        "Sync done: {} folders, {} added, {} missing, {} restored",
        summary.folders, summary.added, summary.went_missing, summary.restored
    );
    Ok(summary)
}

/// All supported files under `dir`, in a stable order.
fn walk_supported(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_supported(p))
        .collect();
    paths.sort();
    paths
}

/// Gather everything the library row needs: size, dimensions (images only,
/// best effort) and a content hash for dedup.
async fn probe(path: &Path, folder_id: Option<i64>) -> Result<NewMediaFile, ImportError> {
    let metadata = tokio::fs::metadata(path).await.path(path)?;

    let (width, height) = if is_image(path) {
        match image::image_dimensions(path) {
            Ok((w, h)) => (Some(i64::from(w)), Some(i64::from(h))),
            // Unreadable header; keep the file, skip the dimensions.
            Err(_) => (None, None),
        }
    } else {
        (None, None)
    };

    let bytes = tokio::fs::read(path).await.path(path)?;
    let sha256 = format!("{:x}", Sha256::digest(&bytes));

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(NewMediaFile {
        folder_id,
        path: path.to_string_lossy().into_owned(),
        file_name,
        size_bytes: metadata.len() as i64,
        width,
        height,
        sha256,
    })
}
