//! The window-close teardown.
//!
//! Ordering matters: listeners are dropped before their player, live
//! subsystems before the stores they might still write through, and the
//! database checkpoint goes last so nothing in-flight can race it. Every
//! step is guarded: a failure is logged into the report and the next step
//! runs regardless, so the window always closes.

use std::sync::Arc;

use lb_auth::Session;
use lb_core::shutdown::{ShutdownReport, ShutdownSequence, StepError};
use lb_core::{info, pt};
use lb_db::{Library, ThumbStore};

use crate::config::AppConfig;
use crate::history::ViewHistory;
use crate::playback::VideoPlayer;
use crate::subsystems::{FpsMonitor, GlobalHotkeys, Projection};

/// Everything the main window owns that needs cleaning up at close.
pub struct WindowResources {
    pub config: AppConfig,
    pub player: Arc<VideoPlayer>,
    pub projection: Arc<Projection>,
    pub hotkeys: Arc<GlobalHotkeys>,
    pub fps: Arc<FpsMonitor>,
    pub session: Arc<Session>,
    pub history: ViewHistory,
    pub thumbs: ThumbStore,
    pub library: Library,
}

/// Build the fixed close sequence. Registered once, run once.
pub fn build_sequence(resources: WindowResources) -> ShutdownSequence {
    let WindowResources {
        config,
        player,
        projection,
        hotkeys,
        fps,
        session,
        history,
        thumbs,
        library,
    } = resources;

    let save_history = config.save_history_on_exit();
    let mut sequence = ShutdownSequence::new();

    sequence.push("save settings", async move {
        config
            .save()
            .await
            .map_err(|e| StepError::new(e.to_string()))
    });

    {
        let player = player.clone();
        sequence.push("unsubscribe playback listeners", async move {
            player.unsubscribe_all();
            Ok(())
        });
    }

    sequence.push("stop video player", async move {
        player.stop_and_release();
        Ok(())
    });

    sequence.push("close projection", async move {
        projection.close_and_release();
        Ok(())
    });

    sequence.push("release global hotkeys", async move {
        hotkeys.release();
        Ok(())
    });

    sequence.push("stop fps monitor", async move {
        fps.stop_and_release();
        Ok(())
    });

    sequence.push("tear down auth session", async move {
        session.teardown();
        Ok(())
    });

    sequence.push("save or clear history", async move {
        let result = if save_history {
            history.save().await
        } else {
            ViewHistory::clear_on_disk().await
        };
        result.map_err(|e| StepError::new(e.to_string()))
    });

    // Feature-specific connection first, then the primary one,
    // each independently guarded.
    sequence.push("checkpoint thumbnail store", async move {
        thumbs
            .checkpoint_and_close()
            .await
            .map_err(|e| StepError::new(e.to_string()))
    });

    sequence.push("checkpoint library", async move {
        library
            .checkpoint_and_close()
            .await
            .map_err(|e| StepError::new(e.to_string()))
    });

    sequence
}

/// Run the close sequence and log what happened.
pub async fn run(resources: WindowResources) -> ShutdownReport {
    pt!("Window closing, running teardown");
    let report = build_sequence(resources).run().await;
    info!("{}", report.summary());
    report
}
