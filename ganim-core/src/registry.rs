//! Every file touched so far, keyed by current path.
//!
//! The registry is the only owner of [`File`] values. Its two transitions
//! are [`FileRegistry::apply`], run once per modification, and
//! [`FileRegistry::advance`], run once per commit boundary. Deletion is
//! two-phase: `apply` only marks a file, `advance` sweeps it, so the emptied
//! file stays visible for the rest of the commit that deleted it.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::file::File;
use crate::types::Modification;

/// Number of entries shown in the file-tab strip.
pub const TAB_LIMIT: usize = 15;

/// One entry of the file-tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub path: PathBuf,
    pub name: String,
    pub is_current: bool,
    pub is_deleted: bool,
}

/// Ordered path → file store.
///
/// Iteration order runs from least to most recently touched, not from first
/// touched: every `apply` moves its file to the back, so a file edited again
/// jumps ahead of files added after it. Only the tab strip observes this
/// order, which is why [`tabs`](Self::tabs) can list the latest first.
#[derive(Debug, Default)]
pub struct FileRegistry {
    files: IndexMap<PathBuf, File>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&File> {
        self.files.get(path)
    }

    pub fn get_mut(&mut self, path: &Path) -> Option<&mut File> {
        self.files.get_mut(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Files from least to most recently touched.
    pub fn iter(&self) -> impl Iterator<Item = &File> {
        self.files.values()
    }

    /// Applies the file-identity part of `modification` and returns the file
    /// whose content the driver should animate.
    pub fn apply(&mut self, modification: &Modification) -> Result<&mut File> {
        match (&modification.old_path, &modification.new_path) {
            (None, Some(new)) => {
                // A stale entry at the same path is replaced outright.
                self.files.shift_remove(new);
                let (index, _) = self.files.insert_full(new.clone(), File::new(new.clone()));
                tracing::debug!(path = %new.display(), "file added");
                Ok(&mut self.files[index])
            }
            (Some(old), None) => {
                let file = self
                    .files
                    .get_mut(old)
                    .ok_or_else(|| Error::NotFound { path: old.clone() })?;
                file.is_deleted = true;
                tracing::debug!(path = %old.display(), "file marked deleted");
                Ok(file)
            }
            (Some(old), Some(new)) => {
                let mut file = self
                    .files
                    .shift_remove(old)
                    .ok_or_else(|| Error::NotFound { path: old.clone() })?;
                file.is_current = true;
                if new != old {
                    tracing::debug!(from = %old.display(), to = %new.display(), "file renamed");
                    file.path = new.clone();
                    // A rename onto a tracked path supersedes that entry.
                    self.files.shift_remove(new);
                }
                let (index, _) = self.files.insert_full(new.clone(), file);
                Ok(&mut self.files[index])
            }
            (None, None) => Err(Error::InvariantViolation(
                "modification has neither an old nor a new path".to_owned(),
            )),
        }
    }

    /// Commit boundary: clears `is_current` everywhere, then drops every file
    /// marked deleted. Idempotent.
    pub fn advance(&mut self) {
        for file in self.files.values_mut() {
            file.is_current = false;
        }
        let before = self.files.len();
        self.files.retain(|_, f| !f.is_deleted);
        let swept = before - self.files.len();
        if swept > 0 {
            tracing::debug!(swept, "deleted files dropped");
        }
    }

    /// Most recently touched first, deduplicated by path, at most `limit`.
    pub fn tabs(&self, limit: usize) -> Vec<Tab> {
        self.files
            .values()
            .rev()
            .take(limit)
            .map(|f| Tab {
                path: f.path.clone(),
                name: f.name(),
                is_current: f.is_current,
                is_deleted: f.is_deleted,
            })
            .collect()
    }
}
