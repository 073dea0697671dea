//! Help overlay renderer for ganim.
//!
//! Draws a centred modal over the running animation. `Clear` erases the area
//! first, inside the same `terminal.draw()` closure as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// Skipped on terminals narrower than 40 columns, where the box would have
/// no room for its text.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `theme`: active color theme (supplies `border_active` for the modal border)
/// * `help_scroll`: vertical scroll offset, moved by j/k while the overlay is up
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 40 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(60), Constraint::Percentage(60));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  j/k scroll, ? or Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Playback"),
        Line::from("  p / Space     Pause / resume"),
        Line::from("  ] / [         Type faster / slower (50 wpm steps)"),
        Line::from(""),
        Line::from("View"),
        Line::from("  f             Show / hide the file tabs"),
        Line::from("  c             Show / hide the commit bar"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?             Open / close this help overlay"),
        Line::from("  q / Esc       Quit"),
        Line::from("  Ctrl-c        Quit"),
    ])
}
