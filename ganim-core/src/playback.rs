//! The playback driver: replays a commit list onto a [`FileRegistry`],
//! one character at a time.
//!
//! # Ordering
//!
//! Everything runs on a single task and is strictly sequential: commit order,
//! then modification order within a commit, then the line order chosen by
//! the iteration policy, then characters (erasing before typing on the same
//! line).
//!
//! # Suspension points
//!
//! The driver suspends in exactly two places: after each character
//! mutation for one character interval, and while awaiting a scroll from
//! the [`Stage`]. Both go through the [`Pacer`], so cancellation and pausing
//! are observed at each of them and nowhere else.
//!
//! # Errors
//!
//! A modification that does not fit the reconstructed state (unknown path,
//! no path at all) aborts the whole run. Cancellation is not an error.

use std::future::Future;

use crate::config::{IterationPolicy, PlaybackConfig};
use crate::error::{Error, Result};
use crate::file::File;
use crate::iter::iterate;
use crate::registry::{FileRegistry, Tab, TAB_LIMIT};
use crate::transport::{Halt, Pacer};
use crate::types::{ChangeKind, Commit, Modification};

/// Shown when the driver is started with nothing to play.
pub const EMPTY_HISTORY_NOTICE: &str = "no commits to animate";

/// Lifecycle of one driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    /// Aborted by a history inconsistency.
    Failed,
}

/// How a run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// The rendering side, as seen by the driver.
///
/// Implementations only observe: they receive labels, tab strips and file
/// snapshots, and must never feed state back into the registry.
pub trait Stage: Send {
    /// New commit label, once per commit boundary.
    fn set_label(&mut self, label: &str);

    /// The file-tab strip changed (most recent first).
    fn files_changed(&mut self, tabs: Vec<Tab>);

    /// Bring `line` of the active file into view. Resolves when the
    /// stage considers the transition done.
    fn request_scroll(&mut self, line: usize) -> impl Future<Output = ()> + Send;

    /// `file` changed and should be repainted. Fire-and-forget.
    fn request_refresh(&mut self, file: &File);

    /// A one-off status message.
    fn notice(&mut self, message: &str);

    fn state_changed(&mut self, state: PlaybackState);

    /// The post-completion delay elapsed; the application may exit.
    fn request_quit(&mut self);
}

/// Drives one playback session.
pub struct Playback<S> {
    config: PlaybackConfig,
    registry: FileRegistry,
    stage: S,
    pacer: Pacer,
    state: PlaybackState,
}

impl<S: Stage> Playback<S> {
    pub fn new(config: PlaybackConfig, stage: S, pacer: Pacer) -> Self {
        Self {
            config,
            registry: FileRegistry::new(),
            stage,
            pacer,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn into_parts(self) -> (FileRegistry, S) {
        (self.registry, self.stage)
    }

    fn transition(&mut self, next: PlaybackState) {
        tracing::info!(from = ?self.state, to = ?next, "playback state");
        self.state = next;
        self.stage.state_changed(next);
    }

    /// Plays `commits` to the end, or until cancelled.
    ///
    /// A driver runs at most once; calling this again is an
    /// [`Error::InvariantViolation`].
    pub async fn run(&mut self, commits: &[Commit]) -> Result<Outcome> {
        if self.state != PlaybackState::Idle {
            return Err(Error::InvariantViolation(format!(
                "playback already started (state {:?})",
                self.state
            )));
        }
        self.config.validate()?;
        self.transition(PlaybackState::Running);

        if commits.is_empty() {
            tracing::info!("empty history");
            self.stage.notice(EMPTY_HISTORY_NOTICE);
            self.transition(PlaybackState::Completed);
            return Ok(Outcome::Completed);
        }

        match self.play(commits).await {
            Ok(()) => {}
            Err(Halt::Cancelled) => {
                self.transition(PlaybackState::Cancelled);
                return Ok(Outcome::Cancelled);
            }
            Err(Halt::Failed(e)) => {
                tracing::error!(error = %e, "playback aborted");
                self.transition(PlaybackState::Failed);
                return Err(e);
            }
        }

        // Flush the last commit's transient flags and pending deletions.
        self.registry.advance();
        self.stage.files_changed(self.registry.tabs(TAB_LIMIT));
        self.transition(PlaybackState::Completed);

        if let Some(delay) = self.config.post_completion_delay {
            if self.pacer.sleep(delay).await.is_ok() {
                self.stage.request_quit();
            }
        }
        Ok(Outcome::Completed)
    }

    async fn play(&mut self, commits: &[Commit]) -> std::result::Result<(), Halt> {
        for (index, commit) in commits.iter().enumerate() {
            self.pacer.check()?;
            self.registry.advance();
            self.stage.files_changed(self.registry.tabs(TAB_LIMIT));
            self.stage.set_label(&commit.label());
            tracing::debug!(
                commit = index,
                author = %commit.author,
                modifications = commit.modifications.len(),
                "commit"
            );
            for modification in &commit.modifications {
                self.play_modification(modification).await?;
            }
        }
        Ok(())
    }

    async fn play_modification(&mut self, m: &Modification) -> std::result::Result<(), Halt> {
        let path = self.registry.apply(m)?.path().to_path_buf();
        self.stage.files_changed(self.registry.tabs(TAB_LIMIT));

        let file = self
            .registry
            .get_mut(&path)
            .ok_or_else(|| Error::NotFound { path: path.clone() })?;
        self.stage.request_refresh(file);

        if m.kind == ChangeKind::Delete && m.deleted.len() == file.line_count() {
            tracing::debug!(path = %path.display(), "whole-file delete, not animated");
            return Ok(());
        }
        animate(
            file,
            m,
            self.config.iteration_policy,
            &mut self.stage,
            &mut self.pacer,
        )
        .await
    }
}

/// Erases and types one modification's lines into `file`.
async fn animate<S: Stage>(
    file: &mut File,
    m: &Modification,
    policy: IterationPolicy,
    stage: &mut S,
    pacer: &mut Pacer,
) -> std::result::Result<(), Halt> {
    for visit in iterate(m, policy, file.cursor_line) {
        pacer.guard(stage.request_scroll(visit.line)).await?;

        if visit.line > 0 {
            for _ in visit.deleted.chars() {
                if !file.erase_char(visit.line) {
                    break;
                }
                stage.request_refresh(file);
                pacer.tick().await?;
            }

            if !visit.added.is_empty() {
                file.ensure_line(visit.line);
                for ch in visit.added.chars() {
                    file.type_char(visit.line, ch);
                    stage.request_refresh(file);
                    pacer.tick().await?;
                }
            }
        }

        file.trim_trailing_empty();
        file.cursor_line = visit.line;
    }
    stage.request_refresh(file);
    Ok(())
}
