//! Import pipeline for the Lightbox media library.
//!
//! Three entry points, matching what the menus offer: import one file,
//! import a folder, and sync every registered folder. All of them are plain
//! async functions over an open [`lb_db::Library`]; the shell runs them on a
//! background task and marshals the summary back before touching any
//! UI-visible state.

mod import;

pub use import::{
    import_file, import_folder, is_supported, sync_all_folders, FolderImport, ImportError,
    SyncSummary, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};
