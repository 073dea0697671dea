//! Screen layout and the commit bar.
//!
//! Pure layout arithmetic plus the one-row commit bar. Called inside
//! `terminal.draw()` on every render, so every frame reflects the current
//! terminal size and panel toggles.
//!
//! ```text
//! ┌ tab strip (1 row, `f`) ─────────────┐
//! │ content panel (fills)               │
//! └ commit bar (1 row, `c`) ────────────┘
//! ```

use ganim_core::PlaybackState;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crate::app::AppState;
use crate::theme::Theme;

/// Returns `[tab_strip, content, commit_bar]`. Hidden bars get zero height.
///
/// # Arguments
///
/// * `frame`: current render frame (provides the live terminal size)
/// * `state`: read-only app state supplying panel visibility
pub fn compute_layout(frame: &Frame, state: &AppState) -> [Rect; 3] {
    let bar = |visible: bool| Constraint::Length(u16::from(visible));
    frame.area().layout(&Layout::vertical([
        bar(state.show_files),
        Constraint::Fill(1),
        bar(state.show_commit),
    ]))
}

/// The inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

/// A bordered `Block` for the content panel.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, theme: &Theme) -> Block<'a> {
    Block::bordered()
        .title(title)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
}

/// Right-hand status text and its color.
pub fn status_text(state: &AppState, theme: &Theme) -> (String, Color) {
    let wpm = state.words_per_minute;
    match state.playback {
        PlaybackState::Idle if state.loading => ("reading history".to_owned(), theme.state_paused),
        PlaybackState::Idle => ("idle".to_owned(), theme.state_paused),
        PlaybackState::Running if state.paused => {
            (format!("paused · {wpm} wpm"), theme.state_paused)
        }
        PlaybackState::Running => (format!("playing · {wpm} wpm"), theme.state_running),
        PlaybackState::Completed => ("done".to_owned(), theme.state_done),
        PlaybackState::Cancelled => ("cancelled".to_owned(), theme.state_done),
        PlaybackState::Failed => ("failed".to_owned(), theme.state_failed),
    }
}

/// The commit label with the author highlighted, or the pending notice.
fn label_line<'a>(state: &'a AppState, theme: &Theme) -> Line<'a> {
    if let Some(notice) = &state.notice {
        return Line::from(Span::styled(
            notice.as_str(),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }
    match state.label.split_once(": ") {
        Some((author, message)) => Line::from(vec![
            Span::styled(
                format!("<{author}>"),
                Style::default()
                    .fg(theme.commit_author)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(": "),
            Span::raw(message),
        ]),
        None => Line::from(state.label.as_str()),
    }
}

/// Renders the one-row commit bar: label on the left, playback state and
/// rate on the right.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the 1-row `Rect` from [`compute_layout`] (index 2)
/// * `state`: read-only app state
/// * `theme`: active color theme
pub fn render_commit_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (status, status_fg) = status_text(state, theme);
    let status_width = u16::try_from(status.chars().count() + 2).unwrap_or(u16::MAX);
    let [left, right] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(status_width)]));

    let bar_style = Style::default().bg(theme.commit_bar_bg).fg(theme.commit_bar_fg);
    frame.render_widget(
        Paragraph::new(label_line(state, theme)).style(bar_style),
        left,
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {status} "),
            Style::default().fg(status_fg).add_modifier(Modifier::BOLD),
        )))
        .style(bar_style),
        right,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_playback() {
        let theme = Theme::dark();
        let mut s = AppState::default();
        assert_eq!(status_text(&s, &theme).0, "reading history");

        s.loading = false;
        s.playback = PlaybackState::Running;
        assert_eq!(status_text(&s, &theme), ("playing · 500 wpm".to_owned(), theme.state_running));

        s.paused = true;
        assert_eq!(status_text(&s, &theme).0, "paused · 500 wpm");

        s.playback = PlaybackState::Failed;
        assert_eq!(status_text(&s, &theme).1, theme.state_failed);
    }

    #[test]
    fn author_is_split_from_the_message() {
        let theme = Theme::dark();
        let mut s = AppState::default();
        s.label = "mark: fix: the thing".into();
        let line = label_line(&s, &theme);
        assert_eq!(line.spans[0].content, "<mark>");
        assert_eq!(line.spans[2].content, "fix: the thing");
    }

    #[test]
    fn notice_replaces_the_label() {
        let theme = Theme::dark();
        let mut s = AppState::default();
        s.label = "mark: init".into();
        s.notice = Some("no commits to animate".into());
        let line = label_line(&s, &theme);
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "no commits to animate");
    }
}
