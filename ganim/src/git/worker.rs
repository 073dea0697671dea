//! Background thread that owns the `git2::Repository` for its lifetime.
//!
//! The repository is opened inside the thread, never passed in. All
//! communication is via channels: [`MineRequest`] in, `AppEvent::History` out.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};
use git2::Repository;
use tokio::sync::mpsc::UnboundedSender;

use crate::event::AppEvent;
use crate::git::miner;
use crate::git::types::{MineError, MineRequest};

/// Starts the worker thread and returns the request sender.
///
/// Dropping the sender ends the thread once it finishes its current request.
pub fn spawn(
    path: PathBuf,
    event_tx: UnboundedSender<AppEvent>,
) -> std::io::Result<Sender<MineRequest>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::Builder::new()
        .name("ganim-git".into())
        .spawn(move || git_worker_loop(path, rx, event_tx))?;
    Ok(tx)
}

/// Opens the repository containing `path` and answers requests until the
/// channel closes.
///
/// If the repository cannot be opened the failure is reported once as a
/// `History` error and the thread exits.
pub fn git_worker_loop(
    path: PathBuf,
    rx: Receiver<MineRequest>,
    event_tx: UnboundedSender<AppEvent>,
) {
    let repo = match Repository::discover(&path) {
        Ok(r) => r,
        Err(source) => {
            tracing::error!(path = %path.display(), error = %source, "cannot open repository");
            let _ = event_tx.send(AppEvent::History(Err(MineError::Open { path, source })));
            return;
        }
    };
    tracing::info!(workdir = ?repo.workdir(), "repository opened");

    for request in rx {
        match request {
            MineRequest::History(opts) => {
                let result = miner::mine(&repo, &opts);
                if let Err(e) = &result {
                    tracing::error!(error = %e, "mining failed");
                }
                if event_tx.send(AppEvent::History(result)).is_err() {
                    break;
                }
            }
        }
    }
}
