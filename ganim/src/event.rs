//! Event bus for ganim.
//!
//! Terminal input, render ticks, the git miner's answer and everything the
//! playback task publishes are normalised into a single [`AppEvent`] and sent
//! over a tokio unbounded MPSC channel. The main loop is the only receiver.
//!
//! A single render interval (33 ms ≈ 30 FPS) drives repainting: one
//! `terminal.draw()` per tick, which also advances any in-flight scroll
//! easing.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use ganim_core::{Commit, Outcome, PlaybackState, Tab};
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::git::types::MineError;

/// All events the application can receive from any source.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    Key(KeyEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    Render,
    /// The git miner finished walking the history.
    History(Result<Vec<Commit>, MineError>),
    /// Something the playback task published.
    Playback(PlaybackEvent),
}

/// Updates flowing from the playback task to the UI.
///
/// The UI only ever sees owned copies of the driver's state; it never holds
/// a reference into the file registry.
#[derive(Debug)]
pub enum PlaybackEvent {
    Label(String),
    Tabs(Vec<Tab>),
    /// Bring this 1-based line of the active file into view.
    Scroll(usize),
    Snapshot(Box<ViewSnapshot>),
    Notice(String),
    State(PlaybackState),
    /// The post-completion delay elapsed.
    QuitRequested,
    /// The driver returned.
    Finished(Result<Outcome, ganim_core::Error>),
}

/// One repaint's worth of the file being animated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub path: PathBuf,
    pub content: Vec<String>,
    pub cursor_line: usize,
}

/// Holds the sender and receiver ends of the unified event channel.
///
/// The sender (`tx`) is cloned for the event task, the git worker and the
/// playback stage; the receiver (`rx`) is owned by the main event loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the background task that feeds terminal input and render ticks
/// into the unified channel.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream if
/// crossterm's event source ever ends. Only key presses are forwarded, since
/// some platforms also report releases. The task exits once the receiver is
/// gone.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
