//! UI rendering module for ganim.
//!
//! `render()` is the single entry point, called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic and the commit bar live in
//! `layout.rs`; the tab strip, the content panel and the help overlay each
//! have their own file.

mod layout;
pub mod content_view;
pub mod file_tabs;
pub mod help;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_commit_bar};

/// Renders one complete frame.
///
/// The content panel's inner height is written back into `state` before
/// drawing so the next scroll request centres against the real viewport.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: mutable reference to app state (viewport height is cached here)
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [tabs, content, commit_bar] = compute_layout(frame, state);
    state.viewport_height = inner_rect(content).height;

    if tabs.height > 0 {
        file_tabs::render_file_tabs(frame, tabs, &state.tabs, theme);
    }

    content_view::render_content(frame, content, state, theme);

    if commit_bar.height > 0 {
        render_commit_bar(frame, commit_bar, state, theme);
    }

    // Drawn last so it sits on top.
    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
