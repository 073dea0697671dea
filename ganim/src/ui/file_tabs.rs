//! File-tab strip renderer for ganim.
//!
//! One row listing the most recently touched files, newest first. Files the
//! current commit touches are underlined, the one being animated is also
//! bold, and files the commit deletes are struck through.

use ganim_core::Tab;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::theme::Theme;

const SEPARATOR: &str = "  ";

/// Builds the tab strip as one styled `Line`.
pub fn tab_line(tabs: &[Tab], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(tabs.len() * 2);
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::styled(tab.name.clone(), tab_style(tab, i == 0, theme)));
    }
    Line::from(spans)
}

fn tab_style(tab: &Tab, is_first: bool, theme: &Theme) -> Style {
    if tab.is_deleted {
        return Style::default()
            .fg(theme.tab_deleted)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    if !tab.is_current {
        return Style::default().fg(theme.tab_other);
    }
    let style = Style::default()
        .fg(theme.tab_current)
        .add_modifier(Modifier::UNDERLINED);
    if is_first {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn render_file_tabs(frame: &mut Frame, area: Rect, tabs: &[Tab], theme: &Theme) {
    frame.render_widget(Paragraph::new(tab_line(tabs, theme)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tab(name: &str, is_current: bool, is_deleted: bool) -> Tab {
        Tab {
            path: PathBuf::from(format!("src/{name}")),
            name: name.to_owned(),
            is_current,
            is_deleted,
        }
    }

    #[test]
    fn names_are_joined_in_order() {
        let theme = Theme::dark();
        let line = tab_line(&[tab("a.rs", true, false), tab("b.rs", false, false)], &theme);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "a.rs  b.rs");
    }

    #[test]
    fn styles_reflect_file_state() {
        let theme = Theme::dark();
        let tabs = [
            tab("live.rs", true, false),
            tab("also.rs", true, false),
            tab("gone.rs", true, true),
            tab("old.rs", false, false),
        ];
        let line = tab_line(&tabs, &theme);
        let styles: Vec<Style> = line.spans.iter().step_by(2).map(|s| s.style).collect();

        assert!(styles[0].add_modifier.contains(Modifier::BOLD | Modifier::UNDERLINED));
        assert!(styles[1].add_modifier.contains(Modifier::UNDERLINED));
        assert!(!styles[1].add_modifier.contains(Modifier::BOLD));
        assert!(styles[2].add_modifier.contains(Modifier::CROSSED_OUT));
        assert_eq!(styles[2].fg, Some(theme.tab_deleted));
        assert_eq!(styles[3].fg, Some(theme.tab_other));
    }

    #[test]
    fn empty_strip() {
        assert!(tab_line(&[], &Theme::dark()).spans.is_empty());
    }
}
