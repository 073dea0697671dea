//! Command-line surface.
//!
//! Every behaviour flag is optional here so that an unset flag falls through
//! to the config file, and from there to the built-in default.

use std::path::PathBuf;

use clap::Parser;
use ganim_core::IterationPolicy;

use crate::easing::Easing;

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Replay a git history as a typing animation", long_about = None)]
pub struct Args {
    /// Repository-relative paths to animate; defaults to every file
    pub targets: Vec<PathBuf>,

    /// Path to the repository, defaults to the current directory
    #[arg(short, long, default_value = ".")]
    pub repo: PathBuf,

    /// Typing speed in words per minute
    #[arg(short, long)]
    pub wpm: Option<u32>,

    /// Order in which the lines of a change are visited
    #[arg(short, long, value_enum)]
    pub iteration: Option<Iteration>,

    /// Scroll easing curve
    #[arg(long, value_enum)]
    pub easing_style: Option<Easing>,

    /// Scroll easing duration in seconds
    #[arg(long)]
    pub easing_duration: Option<f64>,

    /// Exit this many seconds after the last commit has been animated
    #[arg(long, value_name = "SECS")]
    pub quit_once_done: Option<f64>,

    /// Colour theme (dark, catppuccin-mocha)
    #[arg(long)]
    pub theme: Option<String>,

    /// Show line numbers in the content view
    #[arg(long)]
    pub line_numbers: Option<bool>,

    /// Syntax-highlight the content view by file extension
    #[arg(long)]
    pub highlight_syntax: Option<bool>,

    /// Only replay commits after this revision
    #[arg(long)]
    pub from_commit: Option<String>,

    /// Stop at this revision instead of HEAD
    #[arg(long)]
    pub to_commit: Option<String>,

    /// Replay from the newest commit backwards
    #[arg(long)]
    pub newest_first: bool,

    /// Only animate files with these extensions (e.g. rs,toml)
    #[arg(long, value_delimiter = ',')]
    pub only_file_types: Vec<String>,
}

/// [`IterationPolicy`] as spelled on the command line.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Iteration {
    /// Resume near the previous edit and wrap around
    Nearest,
    /// Walk each change from the top of the file
    TopToBottom,
}

impl From<Iteration> for IterationPolicy {
    fn from(i: Iteration) -> Self {
        match i {
            Iteration::Nearest => IterationPolicy::Nearest,
            Iteration::TopToBottom => IterationPolicy::TopToBottom,
        }
    }
}
