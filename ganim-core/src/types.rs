//! Owned history types handed over by the git-mining side.
//!
//! Everything here is fully owned and `Send` so a `Vec<Commit>` built on the
//! git worker thread can be moved into the playback task unchanged.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Line number (1-based) to line content. Sorted by construction.
pub type LineMap = BTreeMap<usize, String>;

/// How a file changed within a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Delete,
    Modify,
    Rename,
}

/// One file's line-level change set within one commit.
///
/// `old_path` is `None` for a created file and `new_path` is `None` for a
/// deleted one. At least one of the two is expected to be set; a
/// modification with neither is rejected by the registry.
#[derive(Debug, Clone)]
pub struct Modification {
    pub old_path: Option<PathBuf>,
    pub new_path: Option<PathBuf>,
    pub kind: ChangeKind,
    /// Final content at each added line, keyed by new-file line number.
    pub added: LineMap,
    /// Removed content, keyed by old-file line number.
    pub deleted: LineMap,
}

impl Modification {
    /// A file created with the given lines.
    pub fn add(path: impl Into<PathBuf>, added: LineMap) -> Self {
        Self {
            old_path: None,
            new_path: Some(path.into()),
            kind: ChangeKind::Add,
            added,
            deleted: LineMap::new(),
        }
    }

    /// A file removed along with the given lines.
    pub fn delete(path: impl Into<PathBuf>, deleted: LineMap) -> Self {
        Self {
            old_path: Some(path.into()),
            new_path: None,
            kind: ChangeKind::Delete,
            added: LineMap::new(),
            deleted,
        }
    }

    /// An in-place edit of an existing file.
    pub fn modify(path: impl Into<PathBuf>, added: LineMap, deleted: LineMap) -> Self {
        let path = path.into();
        Self {
            old_path: Some(path.clone()),
            new_path: Some(path),
            kind: ChangeKind::Modify,
            added,
            deleted,
        }
    }

    /// A move from `from` to `to`, optionally with edits.
    pub fn rename(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        added: LineMap,
        deleted: LineMap,
    ) -> Self {
        Self {
            old_path: Some(from.into()),
            new_path: Some(to.into()),
            kind: ChangeKind::Rename,
            added,
            deleted,
        }
    }

    /// Every line number present in either `added` or `deleted`, ascending.
    pub fn touched_lines(&self) -> Vec<usize> {
        let set: BTreeSet<usize> = self.added.keys().chain(self.deleted.keys()).copied().collect();
        set.into_iter().collect()
    }
}

/// A single commit as the playback driver sees it.
#[derive(Debug, Clone)]
pub struct Commit {
    pub author: String,
    pub message: String,
    /// In the order the miner produced them. Never reordered.
    pub modifications: Vec<Modification>,
}

impl Commit {
    /// Text shown in the commit bar while this commit animates.
    pub fn label(&self) -> String {
        format!("{}: {}", self.author, self.message)
    }
}

/// Builds a [`LineMap`] from `(line, text)` pairs.
///
/// Convenience for tests and for the miner; later duplicates overwrite
/// earlier ones.
pub fn line_map<I, S>(lines: I) -> LineMap
where
    I: IntoIterator<Item = (usize, S)>,
    S: Into<String>,
{
    lines.into_iter().map(|(n, s)| (n, s.into())).collect()
}
