//! Rise and fall curves
//!
//! Every curve maps `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`. Inputs outside
//! the unit range are clamped.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    Linear,
    EaseInSine,
    EaseOutSine,
    #[default]
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// Jumps from 0 to 1 halfway through.
    Step,
}

impl Curve {
    pub const ALL: [Curve; 11] = [
        Curve::Linear,
        Curve::EaseInSine,
        Curve::EaseOutSine,
        Curve::EaseInOutSine,
        Curve::EaseInQuad,
        Curve::EaseOutQuad,
        Curve::EaseInOutQuad,
        Curve::EaseInCubic,
        Curve::EaseOutCubic,
        Curve::EaseInOutCubic,
        Curve::Step,
    ];

    pub fn evaluate(self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Curve::Linear => x,
            Curve::EaseInSine => 1.0 - (x * PI / 2.0).cos(),
            Curve::EaseOutSine => (x * PI / 2.0).sin(),
            Curve::EaseInOutSine => -((PI * x).cos() - 1.0) / 2.0,
            Curve::EaseInQuad => x * x,
            Curve::EaseOutQuad => 1.0 - (1.0 - x) * (1.0 - x),
            Curve::EaseInOutQuad => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }
            Curve::EaseInCubic => x * x * x,
            Curve::EaseOutCubic => 1.0 - (1.0 - x).powi(3),
            Curve::EaseInOutCubic => {
                if x < 0.5 {
                    4.0 * x * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
                }
            }
            Curve::Step => {
                if x < 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::EaseInSine => "ease-in-sine",
            Curve::EaseOutSine => "ease-out-sine",
            Curve::EaseInOutSine => "ease-in-out-sine",
            Curve::EaseInQuad => "ease-in-quad",
            Curve::EaseOutQuad => "ease-out-quad",
            Curve::EaseInOutQuad => "ease-in-out-quad",
            Curve::EaseInCubic => "ease-in-cubic",
            Curve::EaseOutCubic => "ease-out-cubic",
            Curve::EaseInOutCubic => "ease-in-out-cubic",
            Curve::Step => "step",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurve(pub String);

impl fmt::Display for UnknownCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown curve '{}'", self.0)
    }
}

impl std::error::Error for UnknownCurve {}

/// Names match ignoring case, `-` and `_`: `easeinoutsine`, `ease-in-out-sine` and
/// `EaseInOutSine` are the same curve.
impl FromStr for Curve {
    type Err = UnknownCurve;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Curve::ALL
            .into_iter()
            .find(|curve| curve.name().replace('-', "") == normalized)
            .ok_or_else(|| UnknownCurve(s.to_string()))
    }
}
