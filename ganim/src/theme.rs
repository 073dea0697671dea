//! Color theme system for ganim.
//!
//! Two built-in themes are provided:
//!
//! - `dark`: ANSI 16 colors only, so it works on any terminal including
//!   256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha`: the Catppuccin Mocha palette in RGB; needs truecolor.
//!
//! Each theme also names the bundled syntect theme used when syntax
//! highlighting is on.

use ratatui::style::Color;

/// All color values used across ganim's UI surfaces.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Border of the content panel.
    pub border: Color,
    /// Border of the help overlay.
    pub border_active: Color,

    // File-tab strip
    /// Files touched by the commit being animated.
    pub tab_current: Color,
    /// Files from earlier commits.
    pub tab_other: Color,
    /// Files deleted by the commit being animated.
    pub tab_deleted: Color,

    // Content view
    pub text: Color,
    pub line_number: Color,
    /// Line number of the line under the cursor.
    pub line_number_cursor: Color,

    // Commit bar
    pub commit_bar_bg: Color,
    pub commit_bar_fg: Color,
    pub commit_author: Color,
    pub state_running: Color,
    pub state_paused: Color,
    pub state_done: Color,
    pub state_failed: Color,

    /// Name of a theme in syntect's default `ThemeSet`.
    pub syntax_theme: &'static str,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    pub fn dark() -> Self {
        Self {
            border: Color::DarkGray,
            border_active: Color::Cyan,

            tab_current: Color::Reset,
            tab_other: Color::DarkGray,
            tab_deleted: Color::Red,

            text: Color::Reset,
            line_number: Color::DarkGray,
            line_number_cursor: Color::Yellow,

            commit_bar_bg: Color::DarkGray,
            commit_bar_fg: Color::White,
            commit_author: Color::Cyan,
            state_running: Color::Green,
            state_paused: Color::Yellow,
            state_done: Color::Cyan,
            state_failed: Color::Red,

            syntax_theme: "base16-ocean.dark",
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let peach = Color::Rgb(250, 179, 135); // #fab387

        Self {
            border: overlay1,
            border_active: lavender,

            tab_current: text,
            tab_other: overlay0,
            tab_deleted: red,

            text,
            line_number: overlay0,
            line_number_cursor: peach,

            commit_bar_bg: surface1,
            commit_bar_fg: text,
            commit_author: teal,
            state_running: green,
            state_paused: yellow,
            state_done: lavender,
            state_failed: red,

            syntax_theme: "base16-mocha.dark",
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup. The fallback is logged, not a hard error.
    ///
    /// # Arguments
    ///
    /// * `name`: theme name from config or flags, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                tracing::warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve() {
        assert_eq!(Theme::from_name("dark").syntax_theme, "base16-ocean.dark");
        assert_eq!(
            Theme::from_name("catppuccin_mocha").syntax_theme,
            "base16-mocha.dark"
        );
        assert_eq!(Theme::from_name("solarized").border, Theme::dark().border);
    }
}
