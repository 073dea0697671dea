//! Requests, options and errors for the git background thread.

use std::path::PathBuf;

/// Which part of the history to mine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MineOptions {
    /// Repository-relative paths to keep. Empty keeps every file.
    pub targets: Vec<PathBuf>,
    /// Extensions to keep, each with a leading `.`. Empty keeps every file.
    pub only_file_types: Vec<String>,
    /// Exclusive lower bound: this revision and its ancestors are skipped.
    pub from_commit: Option<String>,
    /// Where the walk starts. `None` means `HEAD`.
    pub to_commit: Option<String>,
    /// Emit the newest commit first instead of the oldest.
    pub newest_first: bool,
}

/// Commands sent from the main thread to the git worker thread.
///
/// Sent over a `crossbeam_channel::Sender<MineRequest>`; the worker answers
/// each one with an `AppEvent::History`.
#[derive(Debug)]
pub enum MineRequest {
    History(MineOptions),
}

#[derive(Debug, thiserror::Error)]
pub enum MineError {
    #[error("could not open repository at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: git2::Error,
    },
    #[error("could not resolve revision '{spec}': {source}")]
    Revision { spec: String, source: git2::Error },
    #[error(transparent)]
    Git(#[from] git2::Error),
}
