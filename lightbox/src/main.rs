//! Lightbox, a simple, fast media and image viewer.
//!
//! This binary is the application shell: it owns the collaborators (auth
//! session, library database, import pipeline, playback subsystems), runs
//! the command the user asked for, and always walks the ordered teardown on
//! the way out, the same sequence the windowed build runs at close.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use lb_auth::{
    login_op, register_op, validate_login, validate_registration, Credentials, Session,
};
use lb_core::{err, file_utils, info, pt};
use lb_db::{Library, ThumbStore};

mod config;
mod history;
mod playback;
mod subsystems;
mod teardown;
mod update;

use config::AppConfig;
use lb_auth::{FlowState, SubmitFlow};
use history::ViewHistory;
use playback::{PlaybackEvent, VideoPlayer};
use subsystems::{FpsMonitor, GlobalHotkeys, Projection};
use teardown::WindowResources;

#[derive(Parser)]
#[command(name = "lightbox", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log into the account server
    Login {
        username: String,
        password: String,
    },
    /// Create a new account
    Register {
        username: String,
        password: String,
        confirm_password: String,
        email: String,
    },
    /// Import a single media file into the library
    Import { path: PathBuf },
    /// Import a folder and everything supported inside it
    ImportFolder { path: PathBuf },
    /// Re-scan every registered folder
    Sync,
    /// Mark a file as viewed (records it in the history)
    View { path: PathBuf },
    /// Check the release feed for a newer version
    CheckUpdates,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            err!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let app_dir = file_utils::get_app_dir().map_err(|e| e.to_string())?;

    let mut config = AppConfig::load().await.map_err(|e| e.to_string())?;
    let mut history = ViewHistory::load().await.unwrap_or_default();

    let library = Library::open(&app_dir).await.map_err(|e| e.to_string())?;
    let thumbs = ThumbStore::open(&app_dir).await.map_err(|e| e.to_string())?;

    let session = Arc::new(Session::new(config.server_url(), config.remember_login()));
    let player = Arc::new(VideoPlayer::new());
    let projection = Arc::new(Projection::new());
    let hotkeys = Arc::new(GlobalHotkeys::new());
    let fps = Arc::new(FpsMonitor::new());
    hotkeys.register();

    let mut failed = false;

    match cli.command {
        Command::Login { username, password } => {
            let credentials = Credentials::login(username, password);
            let mut flow = SubmitFlow::login();

            if let Err(error) = validate_login(&credentials) {
                flow.reject(&error);
                err!("{}", flow.status());
                failed = true;
            } else {
                let username = credentials.username.clone();
                let state = flow.submit(login_op(session.clone(), credentials)).await;
                report_flow(&flow);
                if state == FlowState::Success {
                    config.username = username;
                    flow.finish().await;
                } else {
                    failed = true;
                }
            }
        }

        Command::Register {
            username,
            password,
            confirm_password,
            email,
        } => {
            let credentials = Credentials::register(username, password, email);
            let mut flow = SubmitFlow::register();

            if let Err(error) = validate_registration(&credentials, &confirm_password) {
                flow.reject(&error);
                err!("{}", flow.status());
                failed = true;
            } else {
                let username = credentials.username.clone();
                let state = flow.submit(register_op(session.clone(), credentials)).await;
                report_flow(&flow);
                if state == FlowState::Success {
                    config.username = username;
                    flow.finish().await;
                } else {
                    failed = true;
                }
            }
        }

        Command::Import { path } => {
            // Import work runs off the command task; only the marshaled
            // result mutates anything the shell shows.
            let worker = {
                let library = library.clone();
                tokio::spawn(async move { lb_media::import_file(&library, &path).await })
            };
            match worker.await {
                Ok(Ok(Some(file))) => info!("Imported {}", file.file_name),
                Ok(Ok(None)) => info!("Already in the library"),
                Ok(Err(e)) => {
                    err!("Import failed: {e}");
                    failed = true;
                }
                Err(e) => {
                    err!("Import task failed: {e}");
                    failed = true;
                }
            }
        }

        Command::ImportFolder { path } => {
            let worker = {
                let library = library.clone();
                tokio::spawn(async move { lb_media::import_folder(&library, &path).await })
            };
            match worker.await {
                Ok(Ok(outcome)) => info!(
                    "Imported {} new files ({} already known) from {}",
                    outcome.new_files.len(),
                    outcome.existing_files,
                    outcome.folder.path
                ),
                Ok(Err(e)) => {
                    err!("Folder import failed: {e}");
                    failed = true;
                }
                Err(e) => {
                    err!("Import task failed: {e}");
                    failed = true;
                }
            }
        }

        Command::Sync => {
            let worker = {
                let library = library.clone();
                tokio::spawn(async move { lb_media::sync_all_folders(&library).await })
            };
            match worker.await {
                Ok(Ok(summary)) => info!(
                    "Synced {} folders: {} added, {} missing, {} restored",
                    summary.folders, summary.added, summary.went_missing, summary.restored
                ),
                Ok(Err(e)) => {
                    err!("Sync failed: {e}");
                    failed = true;
                }
                Err(e) => {
                    err!("Sync task failed: {e}");
                    failed = true;
                }
            }
        }

        Command::View { path } => {
            history.record(&path);
            player.emit(&PlaybackEvent::Opened(path.clone()));
            pt!("Viewed {}", path.display());
        }

        Command::CheckUpdates => {
            let mut checker = update::UpdateChecker::new(
                update::DEFAULT_FEED_URL,
                config.last_update_check.clone(),
            );
            match checker.check_for_updates().await {
                Ok(Some(version)) => {
                    info!(
                        "Update available: {} -> {}",
                        lb_core::APP_VERSION_NAME,
                        version.version
                    );
                    config.last_update_check = Some(version);
                }
                Ok(None) => {
                    info!("Up to date ({})", lb_core::APP_VERSION_NAME);
                    config.last_update_check = checker.last_checked().cloned();
                }
                Err(e) => {
                    err!("Update check failed: {e}");
                    failed = true;
                }
            }
        }
    }

    // Same fixed sequence the windowed build runs at close. Best effort:
    // its report is logged, never turned into an exit failure.
    teardown::run(WindowResources {
        config,
        player,
        projection,
        hotkeys,
        fps,
        session,
        history,
        thumbs,
        library,
    })
    .await;

    if failed {
        Err("command did not complete successfully".to_owned())
    } else {
        Ok(())
    }
}

fn report_flow(flow: &SubmitFlow) {
    match flow.state() {
        FlowState::Success => info!("{}", flow.status()),
        _ => err!("{}", flow.status()),
    }
}
