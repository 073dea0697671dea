//! ganim: replay a git history as a character-by-character animation.
//!
//! Entry point for the `ganim` binary. Wires together the CLI and config
//! layer (`cli`, `config`), the git worker thread (`git`), the playback
//! driver from `ganim-core` (through `stage`), the unified event bus
//! (`event`) and the terminal (`tui`, `ui`).
//!
//! # Startup sequence
//!
//! 1. Logging to a file, so the alternate screen is never written over.
//! 2. Parse flags and resolve settings. Bad settings exit with status 2
//!    before the terminal is touched.
//! 3. `install_panic_hook()`, then `register_sigterm()`.
//! 4. Spawn the git worker and ask it for the history.
//! 5. `init_tui()` and `spawn_event_task()`.
//! 6. When the history arrives, the playback driver is spawned as a tokio
//!    task that reports back through [`stage::TuiStage`].
//!
//! The event loop exits only via `break`, so `restore_tui()` is always
//! reached. Failures are printed to stderr after the terminal is restored.

mod app;
mod cli;
mod config;
mod easing;
mod event;
mod git;
mod stage;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use clap::Parser;
use ganim_core::{transport, Outcome, Playback};
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::event::{AppEvent, PlaybackEvent};
use crate::git::types::MineRequest;
use crate::ui::keybindings::{handle_key, KeyAction};

/// Sends tracing output to `$GANIM_LOG_DIR/ganim.log` (default: the system
/// temp dir). The returned guard flushes the writer on drop.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = std::env::var_os("GANIM_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let file_appender = tracing_appender::rolling::never(&log_dir, "ganim.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ganim=info,ganim_core=info,warn".into()),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    tracing::info!(log_dir = %log_dir.display(), "ganim starting");
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    let _log_guard = init_logging();

    let args = cli::Args::parse();
    let settings = match config::resolve(config::load_file_config(), &args) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "invalid settings");
            eprintln!("ganim: {e}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(?settings, "settings resolved");

    let theme = theme::Theme::from_name(&settings.theme);
    let mut state = app::AppState::new(settings.view, settings.playback.words_per_minute);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();

    let handler = event::EventHandler::new();
    let tx = handler.tx.clone();
    let mut rx = handler.rx;

    let git_tx = match git::worker::spawn(settings.repo.clone(), tx.clone()) {
        Ok(git_tx) => git_tx,
        Err(e) => {
            eprintln!("ganim: cannot start git worker: {e}");
            return ExitCode::FAILURE;
        }
    };
    // The worker only hangs up once this sender is dropped, so this cannot fail.
    let _ = git_tx.send(MineRequest::History(settings.mine.clone()));

    let mut terminal = match tui::init_tui() {
        Ok(t) => t,
        Err(e) => {
            let _ = tui::restore_tui();
            eprintln!("ganim: cannot initialise terminal: {e}");
            return ExitCode::FAILURE;
        }
    };
    event::spawn_event_task(tx.clone());

    let mut playback_task: Option<JoinHandle<()>> = None;
    let mut failure: Option<String> = None;

    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when
            // nothing else arrives.
            _ = tokio::time::sleep(Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    tracing::info!("SIGTERM received");
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else {
                    break 'event_loop;
                };
                match event {
                    AppEvent::Render => {
                        state.tick_scroll(Instant::now());
                        if let Err(e) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            failure = Some(format!("draw failed: {e}"));
                            break 'event_loop;
                        }
                    }
                    AppEvent::Key(key) => {
                        if handle_key(key, &mut state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    // ratatui picks up the new size on the next draw.
                    AppEvent::Resize(_, _) => {}
                    AppEvent::History(Ok(commits)) => {
                        tracing::info!(commits = commits.len(), "history mined");
                        state.loading = false;
                        let (controller, pacer) = transport(&settings.playback);
                        state.controller = Some(controller);
                        let stage = stage::TuiStage::new(tx.clone());
                        let mut playback = Playback::new(settings.playback.clone(), stage, pacer);
                        let done_tx = tx.clone();
                        playback_task = Some(tokio::spawn(async move {
                            let result = playback.run(&commits).await;
                            let _ = done_tx.send(AppEvent::Playback(PlaybackEvent::Finished(result)));
                        }));
                    }
                    AppEvent::History(Err(e)) => {
                        failure = Some(e.to_string());
                        break 'event_loop;
                    }
                    AppEvent::Playback(PlaybackEvent::QuitRequested) => break 'event_loop,
                    AppEvent::Playback(PlaybackEvent::Finished(result)) => match result {
                        Ok(Outcome::Completed) => tracing::info!("playback completed"),
                        Ok(Outcome::Cancelled) => break 'event_loop,
                        Err(e) => {
                            failure = Some(e.to_string());
                            break 'event_loop;
                        }
                    },
                    AppEvent::Playback(update) => state.apply_update(update, Instant::now()),
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    if let Some(controller) = &state.controller {
        controller.cancel();
    }
    if let Some(task) = playback_task {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "playback task panicked");
        }
    }
    drop(git_tx);

    if let Err(e) = tui::restore_tui() {
        tracing::warn!(error = %e, "terminal restore failed");
    }

    match failure {
        Some(message) => {
            tracing::error!(%message, "exiting with failure");
            eprintln!("ganim: {message}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
