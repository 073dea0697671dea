use std::path::PathBuf;

/// Failures that abort a playback run.
///
/// Both variants mean the history handed to the driver is inconsistent with
/// the file state reconstructed so far, so continuing would silently
/// desynchronise every later commit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A modification referenced a path the registry has never seen.
    #[error("no tracked file at {}", path.display())]
    NotFound { path: PathBuf },
    /// Input that can not occur in well-formed history.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, Error>;
