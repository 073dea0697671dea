//! Reconstructed content of one tracked file.

use std::path::{Path, PathBuf};

/// A file as rebuilt so far by playback.
///
/// Lines are stored 0-indexed but every method here takes the 1-based line
/// numbers used by modifications. Line `0` is never addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub(crate) path: PathBuf,
    /// Where the nearest-line policy resumes for the next commit.
    pub cursor_line: usize,
    pub content: Vec<String>,
    /// Touched by the commit currently animating.
    pub is_current: bool,
    /// Soft-deleted; dropped by the registry's next `advance`.
    pub is_deleted: bool,
}

impl File {
    /// A freshly created, empty file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cursor_line: 0,
            content: Vec::new(),
            is_current: true,
            is_deleted: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for display, falling back to the full path.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    pub fn line_count(&self) -> usize {
        self.content.len()
    }

    /// Removes the last character of `line`.
    ///
    /// Returns `false` when there was nothing left to remove, either because
    /// the line is empty or because it does not exist.
    pub fn erase_char(&mut self, line: usize) -> bool {
        let Some(text) = line.checked_sub(1).and_then(|i| self.content.get_mut(i)) else {
            return false;
        };
        text.pop().is_some()
    }

    /// Pads with empty lines until `line` exists.
    pub fn ensure_line(&mut self, line: usize) {
        if line > self.content.len() {
            self.content.resize(line, String::new());
        }
    }

    /// Appends `ch` to the end of `line`, creating the line if needed.
    pub fn type_char(&mut self, line: usize, ch: char) {
        if line == 0 {
            return;
        }
        self.ensure_line(line);
        self.content[line - 1].push(ch);
    }

    /// Drops trailing empty lines left over from padding.
    pub fn trim_trailing_empty(&mut self) {
        while self.content.last().is_some_and(String::is_empty) {
            self.content.pop();
        }
    }
}
