//! Config file loading and merging with command-line flags.
//!
//! Precedence, highest first: command-line flag, `config.toml`, built-in
//! default. A missing config file is not an error; a malformed one is logged
//! and ignored so a typo never prevents startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ganim_core::{IterationPolicy, PlaybackConfig};
use serde::Deserialize;

use crate::cli::Args;
use crate::easing::Easing;
use crate::git::types::MineOptions;

pub const DEFAULT_THEME: &str = "catppuccin-mocha";
pub const DEFAULT_WPM: u32 = 500;
pub const DEFAULT_EASING_SECS: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error(transparent)]
    Playback(#[from] ganim_core::Error),
}

/// Keys accepted in `config.toml`. All optional.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub wpm: Option<u32>,
    pub iteration: Option<IterationPolicy>,
    pub easing_style: Option<Easing>,
    pub easing_duration: Option<f64>,
    pub line_numbers: Option<bool>,
    pub highlight_syntax: Option<bool>,
    /// Seconds; negative disables, as on the command line.
    pub quit_once_done: Option<f64>,
}

/// How the content viewport looks and scrolls.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub easing: Easing,
    pub easing_duration: Duration,
    pub line_numbers: bool,
    pub highlight_syntax: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            easing: Easing::default(),
            easing_duration: Duration::from_secs_f64(DEFAULT_EASING_SECS),
            line_numbers: true,
            highlight_syntax: false,
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub repo: PathBuf,
    pub theme: String,
    pub playback: PlaybackConfig,
    pub view: ViewOptions,
    pub mine: MineOptions,
}

/// Returns the path to the ganim config file.
///
/// Prefers `$XDG_CONFIG_HOME/ganim/config.toml`; falls back to
/// `~/.config/ganim/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("ganim").join("config.toml")
}

/// Reads and parses `path`. `Ok(None)` when the file does not exist.
pub fn read_file_config(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads the user's config file, falling back to defaults on any failure.
pub fn load_file_config() -> FileConfig {
    let path = config_path();
    match read_file_config(&path) {
        Ok(Some(cfg)) => {
            tracing::debug!(path = %path.display(), "loaded config");
            cfg
        }
        Ok(None) => FileConfig::default(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring config file");
            FileConfig::default()
        }
    }
}

/// Merges command-line flags over the config file.
pub fn resolve(file: FileConfig, args: &Args) -> Result<Settings, ConfigError> {
    let wpm = args.wpm.or(file.wpm).unwrap_or(DEFAULT_WPM);
    let policy = args
        .iteration
        .map(IterationPolicy::from)
        .or(file.iteration)
        .unwrap_or_default();
    let delay = args
        .quit_once_done
        .or(file.quit_once_done)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok());
    let playback = PlaybackConfig::new(policy, wpm, delay)?;

    let easing_secs = args
        .easing_duration
        .or(file.easing_duration)
        .unwrap_or(DEFAULT_EASING_SECS);
    let easing_duration =
        Duration::try_from_secs_f64(easing_secs).map_err(|e| ConfigError::Invalid {
            key: "easing_duration",
            reason: e.to_string(),
        })?;
    let defaults = ViewOptions::default();
    let view = ViewOptions {
        easing: args.easing_style.or(file.easing_style).unwrap_or(defaults.easing),
        easing_duration,
        line_numbers: args
            .line_numbers
            .or(file.line_numbers)
            .unwrap_or(defaults.line_numbers),
        highlight_syntax: args
            .highlight_syntax
            .or(file.highlight_syntax)
            .unwrap_or(defaults.highlight_syntax),
    };

    let mine = MineOptions {
        targets: args.targets.clone(),
        only_file_types: args
            .only_file_types
            .iter()
            .filter_map(|t| normalize_file_type(t))
            .collect(),
        from_commit: args.from_commit.clone(),
        to_commit: args.to_commit.clone(),
        newest_first: args.newest_first,
    };

    Ok(Settings {
        repo: args.repo.clone(),
        theme: args
            .theme
            .clone()
            .or(file.theme)
            .unwrap_or_else(|| DEFAULT_THEME.to_owned()),
        playback,
        view,
        mine,
    })
}

/// `"py"` and `".py"` both become `".py"`. Blank entries are dropped.
pub fn normalize_file_type(raw: &str) -> Option<String> {
    let t = raw.trim();
    if t.is_empty() || t == "." {
        None
    } else if t.starts_with('.') {
        Some(t.to_owned())
    } else {
        Some(format!(".{t}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ganim").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let s = resolve(FileConfig::default(), &args(&[])).unwrap();
        assert_eq!(s.playback, PlaybackConfig::default());
        assert_eq!(s.view, ViewOptions::default());
        assert_eq!(s.theme, DEFAULT_THEME);
        assert!(s.mine.only_file_types.is_empty());
    }

    #[test]
    fn flags_override_file() {
        let file: FileConfig = toml::from_str(
            r#"
            theme = "dark"
            wpm = 120
            iteration = "top-to-bottom"
            line_numbers = false
            quit_once_done = 4
            "#,
        )
        .unwrap();
        let s = resolve(file, &args(&["--wpm", "900", "--iteration", "nearest"])).unwrap();
        assert_eq!(s.playback.words_per_minute, 900);
        assert_eq!(s.playback.iteration_policy, IterationPolicy::Nearest);
        assert_eq!(s.playback.post_completion_delay, Some(Duration::from_secs(4)));
        assert!(!s.view.line_numbers);
        assert_eq!(s.theme, "dark");
    }

    #[test]
    fn negative_quit_delay_disables_quitting() {
        let s = resolve(FileConfig::default(), &args(&["--quit-once-done=-1"])).unwrap();
        assert_eq!(s.playback.post_completion_delay, None);
    }

    #[test]
    fn zero_wpm_is_rejected() {
        let err = resolve(FileConfig::default(), &args(&["--wpm", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::Playback(_)));
    }

    #[test]
    fn negative_easing_duration_is_rejected() {
        let err = resolve(FileConfig::default(), &args(&["--easing-duration=-0.5"])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "easing_duration", .. }));
    }

    #[test]
    fn file_types_get_a_leading_dot() {
        let s = resolve(FileConfig::default(), &args(&["--only-file-types", "py, .rs,,"])).unwrap();
        assert_eq!(s.mine.only_file_types, vec![".py", ".rs"]);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_file_config(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "wpm = \"fast\"").unwrap();
        assert!(matches!(read_file_config(&path), Err(ConfigError::Parse { .. })));
    }
}
