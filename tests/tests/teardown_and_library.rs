//! End-to-end checks of the shutdown ordering contract and the
//! import/sync pipeline against a real on-disk library.

use std::sync::{Arc, Mutex};

use lb_core::shutdown::{ShutdownSequence, StepError};
use lb_db::{Library, ThumbStore};
use tests::quiet;

#[tokio::test]
async fn a_failing_step_never_stops_the_rest() {
    quiet();
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut sequence = ShutdownSequence::new();

    let names = [
        "save settings",
        "unsubscribe playback listeners",
        "stop video player",
        "close projection",
        "release global hotkeys",
        "stop fps monitor",
        "tear down auth session",
        "save or clear history",
        "checkpoint thumbnail store",
        "checkpoint library",
    ];

    for (i, name) in names.into_iter().enumerate() {
        let log = log.clone();
        sequence.push(name, async move {
            log.lock().unwrap().push(name);
            // Step 3 blows up; everything after it must still run.
            if i == 2 {
                Err(StepError::new("video backend hung"))
            } else {
                Ok(())
            }
        });
    }

    let report = sequence.run().await;
    assert!(!report.all_ok());
    assert_eq!(report.failures().count(), 1);
    assert_eq!(*log.lock().unwrap(), names.to_vec());
}

#[tokio::test]
async fn full_library_lifecycle_import_sync_checkpoint() {
    quiet();
    let db_dir = tempfile::tempdir().unwrap();
    let media_dir = tempfile::tempdir().unwrap();

    let library = Library::open(db_dir.path()).await.unwrap();
    let thumbs = ThumbStore::open(db_dir.path()).await.unwrap();

    // Seed a folder with two supported files and a stray text file.
    for name in ["a.png", "b.jpg", "ignore.txt"] {
        std::fs::write(media_dir.path().join(name), name).unwrap();
    }

    let outcome = lb_media::import_folder(&library, media_dir.path())
        .await
        .unwrap();
    assert_eq!(outcome.new_files.len(), 2);
    assert_eq!(outcome.existing_files, 0);

    // Cache a thumbnail for one of them.
    let first = &outcome.new_files[0];
    thumbs.put(first.id, 64, 64, &[0u8; 16]).await.unwrap();
    assert!(thumbs.get(first.id).await.unwrap().is_some());

    // One file disappears, one appears; sync notices both.
    std::fs::remove_file(media_dir.path().join("a.png")).unwrap();
    std::fs::write(media_dir.path().join("c.webp"), "c").unwrap();

    let summary = lb_media::sync_all_folders(&library).await.unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(summary.went_missing, 1);

    // Both stores checkpoint and close independently, thumbnails first.
    thumbs.checkpoint_and_close().await.unwrap();
    library.checkpoint_and_close().await.unwrap();

    // After TRUNCATE checkpoints, no WAL content is left behind.
    for db in ["thumbs.db", "library.db"] {
        let wal = db_dir.path().join(format!("{db}-wal"));
        if wal.exists() {
            assert_eq!(std::fs::metadata(&wal).unwrap().len(), 0, "{db} kept WAL");
        }
    }
}
