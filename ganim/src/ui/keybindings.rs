//! Keybinding dispatcher for ganim.
//!
//! Translates crossterm `KeyEvent`s into `AppState` mutations and returns a
//! [`KeyAction`] telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so the help overlay has its own
//! isolated handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{AppState, Mode, WPM_STEP};

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    /// Exit: the event loop cancels playback and restores the terminal.
    Quit,
}

/// Dispatches a key event to the handler for the current mode.
///
/// # Arguments
///
/// * `key`: the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    // Raw mode swallows SIGINT, so Ctrl-C has to be handled here.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('f') => state.show_files = !state.show_files,
        KeyCode::Char('c') => state.show_commit = !state.show_commit,
        KeyCode::Char('p') | KeyCode::Char(' ') => state.toggle_pause(),
        KeyCode::Char('[') => state.change_wpm(-i64::from(WPM_STEP)),
        KeyCode::Char(']') => state.change_wpm(i64::from(WPM_STEP)),
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
        _ => {}
    }
    KeyAction::Continue
}

/// While the help overlay is up: `j`/`k` scroll it, `?`/`Esc`/`q` close it.
/// Everything else is swallowed.
fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
            state.mode = Mode::Normal;
        }
        _ => {}
    }
    KeyAction::Continue
}
