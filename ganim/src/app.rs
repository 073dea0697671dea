//! Central application state for ganim.
//!
//! Holds the UI's owned copy of what the playback task last published (tab
//! strip, commit label, active file snapshot), the viewport's scroll easing,
//! panel visibility and the transport controller. No ratatui rendering lives
//! here: `app.rs` is pure state, read by `ui` and mutated by the key
//! dispatcher and the event loop.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ganim_core::{Controller, PlaybackState, Tab};

use crate::config::{ViewOptions, DEFAULT_WPM};
use crate::easing::Easing;
use crate::event::PlaybackEvent;

/// WPM change per `[` / `]` press.
pub const WPM_STEP: u32 = 50;
/// `[` never takes the rate below this.
pub const WPM_FLOOR: u32 = 50;

/// Which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Help overlay is shown above the content view.
    HelpOverlay,
}

/// An in-flight eased scroll of the content viewport.
#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: usize,
    to: usize,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

impl ScrollAnimation {
    /// Offset at `now`, and whether the animation has finished.
    fn sample(&self, now: Instant) -> (usize, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let progress = self.easing.apply(t);
        let from = self.from as f64;
        let offset = from + (self.to as f64 - from) * progress;
        (offset.round().max(0.0) as usize, false)
    }
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    pub mode: Mode,
    /// File-tab strip visible (`f`).
    pub show_files: bool,
    /// Commit bar visible (`c`).
    pub show_commit: bool,
    pub help_scroll: u16,

    /// True until the git worker has answered.
    pub loading: bool,
    pub tabs: Vec<Tab>,
    pub label: String,
    pub notice: Option<String>,
    pub playback: PlaybackState,
    pub paused: bool,
    pub words_per_minute: u32,

    /// Path of the file in the content view.
    pub active_path: Option<PathBuf>,
    pub content: Vec<String>,
    pub cursor_line: usize,

    /// First visible content row (0-based).
    pub scroll: usize,
    scroll_anim: Option<ScrollAnimation>,
    /// Inner height of the content panel, cached after each render.
    pub viewport_height: u16,

    pub view: ViewOptions,
    /// Present once playback has started.
    pub controller: Option<Controller>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewOptions::default(), DEFAULT_WPM)
    }
}

impl AppState {
    pub fn new(view: ViewOptions, words_per_minute: u32) -> Self {
        Self {
            mode: Mode::default(),
            show_files: true,
            show_commit: true,
            help_scroll: 0,
            loading: true,
            tabs: Vec::new(),
            label: String::new(),
            notice: None,
            playback: PlaybackState::Idle,
            paused: false,
            words_per_minute,
            active_path: None,
            content: Vec::new(),
            cursor_line: 0,
            scroll: 0,
            scroll_anim: None,
            viewport_height: 0,
            view,
            controller: None,
        }
    }

    /// Folds one playback update into the view.
    ///
    /// `QuitRequested` and `Finished` are control flow for the event loop and
    /// are ignored here.
    pub fn apply_update(&mut self, update: PlaybackEvent, now: Instant) {
        match update {
            PlaybackEvent::Label(label) => {
                self.label = label;
                self.notice = None;
            }
            PlaybackEvent::Tabs(tabs) => self.tabs = tabs,
            PlaybackEvent::Scroll(line) => self.scroll_to(line, now),
            PlaybackEvent::Snapshot(snapshot) => {
                if self.active_path.as_ref() != Some(&snapshot.path) {
                    self.active_path = Some(snapshot.path);
                    self.scroll = 0;
                    self.scroll_anim = None;
                }
                self.content = snapshot.content;
                self.cursor_line = snapshot.cursor_line;
            }
            PlaybackEvent::Notice(message) => self.notice = Some(message),
            PlaybackEvent::State(state) => self.playback = state,
            PlaybackEvent::QuitRequested | PlaybackEvent::Finished(_) => {}
        }
    }

    /// Starts easing the viewport so `line` sits mid-screen.
    ///
    /// A move of at most one row, or a zero easing duration, applies at once.
    pub fn scroll_to(&mut self, line: usize, now: Instant) {
        let height = usize::from(self.viewport_height);
        let max = self.content.len().max(line).saturating_sub(height);
        let target = line.saturating_sub(height / 2).min(max);

        // Retarget from wherever an in-flight animation has got to.
        self.tick_scroll(now);
        if target.abs_diff(self.scroll) <= 1 || self.view.easing_duration.is_zero() {
            self.scroll = target;
            self.scroll_anim = None;
            return;
        }
        self.scroll_anim = Some(ScrollAnimation {
            from: self.scroll,
            to: target,
            started: now,
            duration: self.view.easing_duration,
            easing: self.view.easing,
        });
    }

    /// Advances the scroll easing to `now`. Called once per render.
    pub fn tick_scroll(&mut self, now: Instant) {
        if let Some(anim) = self.scroll_anim {
            let (offset, done) = anim.sample(now);
            self.scroll = offset;
            if done {
                self.scroll_anim = None;
            }
        }
    }

    /// Play/pause. No-op before playback starts.
    pub fn toggle_pause(&mut self) {
        if let Some(ctl) = &self.controller {
            self.paused = ctl.toggle_pause();
            tracing::info!(paused = self.paused, "transport");
        }
    }

    /// Adjusts the typing rate by `delta` WPM, never below [`WPM_FLOOR`].
    /// Takes effect from the next character.
    pub fn change_wpm(&mut self, delta: i64) {
        let next = (i64::from(self.words_per_minute) + delta).max(i64::from(WPM_FLOOR));
        self.words_per_minute = u32::try_from(next).unwrap_or(u32::MAX);
        if let Some(ctl) = &self.controller {
            ctl.set_words_per_minute(self.words_per_minute);
        }
        tracing::debug!(wpm = self.words_per_minute, "rate changed");
    }
}
