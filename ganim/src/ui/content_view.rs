//! Content panel renderer for ganim.
//!
//! Draws the file being animated with manual virtual scrolling: only
//! `content[scroll..scroll + viewport_height]` is turned into spans per frame,
//! so a repaint per typed character stays O(viewport) on long files.
//!
//! Syntax highlighting, when enabled, runs syntect over the visible window
//! only. Constructs that open above the window (block comments, raw strings)
//! are therefore not seen by the highlighter.

use std::path::Path;
use std::sync::LazyLock;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground and font style are carried over; the background stays
/// the terminal's own.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut out = Style::default();
    if fg.a > 0 {
        out = out.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), out)
}

/// A highlighter for `path`, or `None` when highlighting is off, the file
/// type is unknown or the named syntect theme is missing.
fn highlighter_for(path: Option<&Path>, theme: &Theme) -> Option<HighlightLines<'static>> {
    let ext = path?.extension()?.to_str()?;
    let syntax = PS.find_syntax_by_extension(ext)?;
    let syntect_theme = TS.themes.get(theme.syntax_theme)?;
    Some(HighlightLines::new(syntax, syntect_theme))
}

/// Width of the line-number gutter for a file of `len` lines.
fn gutter_width(len: usize) -> usize {
    len.max(1).to_string().len()
}

/// Builds the visible lines: gutter plus code, `height` rows from `scroll`.
pub fn visible_lines(state: &AppState, theme: &Theme, height: usize) -> Vec<Line<'static>> {
    let total = state.content.len();
    let start = state.scroll.min(total);
    let end = (start + height).min(total);
    let width = gutter_width(total);

    let mut highlighter = if state.view.highlight_syntax {
        highlighter_for(state.active_path.as_deref(), theme)
    } else {
        None
    };

    state.content[start..end]
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            let number = start + offset + 1;
            let mut spans = Vec::new();
            if state.view.line_numbers {
                let gutter_style = if number == state.cursor_line {
                    Style::default()
                        .fg(theme.line_number_cursor)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.line_number)
                };
                spans.push(Span::styled(format!("{number:>width$} "), gutter_style));
            }
            match highlighter.as_mut() {
                Some(h) => {
                    // The newline-aware syntax set wants each line terminated.
                    let code = format!("{text}\n");
                    match h.highlight_line(&code, &PS) {
                        Ok(ranges) => spans.extend(ranges.into_iter().map(|(style, piece)| {
                            syntect_to_span(style, piece.trim_end_matches('\n'))
                        })),
                        Err(_) => spans.push(Span::styled(text.clone(), Style::default().fg(theme.text))),
                    }
                }
                None => spans.push(Span::styled(text.clone(), Style::default().fg(theme.text))),
            }
            Line::from(spans)
        })
        .collect()
}

/// Renders the content panel.
///
/// Shows a placeholder until the first file snapshot arrives.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: the content `Rect` from `compute_layout` (includes borders)
/// * `state`: read-only app state supplying content, cursor and scroll
/// * `theme`: active color theme
pub fn render_content(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let title = match &state.active_path {
        Some(path) => format!(" {} ", path.display()),
        None => " ganim ".to_owned(),
    };
    let inner = inner_rect(area);
    frame.render_widget(panel_block(title, theme), area);

    if state.active_path.is_none() {
        let msg = if state.loading {
            "Reading history..."
        } else {
            "Nothing to show yet."
        };
        frame.render_widget(Paragraph::new(Line::raw(msg)), inner);
        return;
    }

    let lines = visible_lines(state, theme, usize::from(inner.height));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn state_with(lines: &[&str]) -> AppState {
        let mut s = AppState::default();
        s.active_path = Some(PathBuf::from("notes.txt"));
        s.content = lines.iter().map(|l| (*l).to_owned()).collect();
        s
    }

    #[test]
    fn window_starts_at_scroll() {
        let mut s = state_with(&["a", "b", "c", "d"]);
        s.scroll = 1;
        let lines = visible_lines(&s, &Theme::dark(), 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(plain(&lines[0]), "2 b");
        assert_eq!(plain(&lines[1]), "3 c");
    }

    #[test]
    fn gutter_is_right_aligned_and_marks_the_cursor() {
        let theme = Theme::dark();
        let content: Vec<String> = (1..=12).map(|i| format!("l{i}")).collect();
        let mut s = state_with(&[]);
        s.content = content;
        s.cursor_line = 3;
        let lines = visible_lines(&s, &theme, 20);
        assert_eq!(plain(&lines[0]), " 1 l1");
        assert_eq!(plain(&lines[11]), "12 l12");
        assert_eq!(lines[2].spans[0].style.fg, Some(theme.line_number_cursor));
        assert_eq!(lines[1].spans[0].style.fg, Some(theme.line_number));
    }

    #[test]
    fn line_numbers_can_be_hidden() {
        let mut s = state_with(&["only"]);
        s.view.line_numbers = false;
        let lines = visible_lines(&s, &Theme::dark(), 5);
        assert_eq!(plain(&lines[0]), "only");
    }

    #[test]
    fn scroll_past_the_end_is_empty() {
        let mut s = state_with(&["a"]);
        s.scroll = 10;
        assert!(visible_lines(&s, &Theme::dark(), 5).is_empty());
    }

    #[test]
    fn highlighting_keeps_the_text() {
        let mut s = state_with(&["fn main() {}", ""]);
        s.active_path = Some(PathBuf::from("src/main.rs"));
        s.view.highlight_syntax = true;
        s.view.line_numbers = false;
        let lines = visible_lines(&s, &Theme::dark(), 5);
        assert_eq!(plain(&lines[0]), "fn main() {}");
        assert!(lines[0].spans.len() > 1);
        assert_eq!(plain(&lines[1]), "");
    }
}
