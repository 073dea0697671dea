//! Core-facing playback settings.
//!
//! The binary merges its config file and command-line flags down to a
//! [`PlaybackConfig`]; nothing in this crate reads the environment.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Average characters per word used to turn a WPM rate into a delay.
pub const CHARS_PER_WORD: f64 = 4.7;

/// Order in which the lines of one modification are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IterationPolicy {
    /// Start at the touched line nearest the file's cursor, wrap to the top.
    #[default]
    Nearest,
    /// Walk down from line 1.
    TopToBottom,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub iteration_policy: IterationPolicy,
    pub words_per_minute: u32,
    /// How long to linger on the final frame before asking to quit.
    /// `None` keeps the last frame up until cancelled.
    #[serde(with = "opt_secs")]
    pub post_completion_delay: Option<Duration>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            iteration_policy: IterationPolicy::default(),
            words_per_minute: 500,
            post_completion_delay: None,
        }
    }
}

impl PlaybackConfig {
    /// Builds a config, rejecting a zero WPM rate.
    pub fn new(
        iteration_policy: IterationPolicy,
        words_per_minute: u32,
        post_completion_delay: Option<Duration>,
    ) -> Result<Self> {
        let config = Self { iteration_policy, words_per_minute, post_completion_delay };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            return Err(Error::InvariantViolation(
                "words_per_minute must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Delay between two character mutations at the configured rate.
    pub fn char_interval(&self) -> Duration {
        char_interval(self.words_per_minute)
    }
}

/// `60 / (wpm * 4.7)` seconds. A zero rate is clamped to 1 WPM.
pub fn char_interval(words_per_minute: u32) -> Duration {
    let wpm = f64::from(words_per_minute.max(1));
    Duration::from_secs_f64(60.0 / (wpm * CHARS_PER_WORD))
}

/// Serde adapter: optional delay written as fractional seconds.
mod opt_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<f64>::deserialize(de)?;
        Ok(secs.filter(|s| s.is_finite() && *s >= 0.0).map(Duration::from_secs_f64))
    }
}
