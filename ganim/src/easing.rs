//! Easing curves for the content viewport's scroll transitions.

use serde::Deserialize;

/// Shape of a scroll transition over its normalised time `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[value(name = "linear")]
    Linear,
    #[default]
    #[value(name = "in_out_cubic", alias = "in-out-cubic")]
    InOutCubic,
    #[value(name = "out_cubic", alias = "out-cubic")]
    OutCubic,
}

impl Easing {
    /// Maps elapsed fraction `t` to progress fraction. Input is clamped.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}
