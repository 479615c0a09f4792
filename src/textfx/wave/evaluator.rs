//! Wave evaluation and extrema detection

use super::curve::Curve;
use crate::textfx::error::{ParameterError, WaveError};
use crate::textfx::parameters::ParameterMap;
use serde::{Deserialize, Serialize};

/// Raw wave settings, as read from configuration or tag parameters. Validated by
/// [Wave::new].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub up_period: f32,
    pub down_period: f32,
    pub velocity: f32,
    pub amplitude: f32,
    pub crest_wait: f32,
    pub trough_wait: f32,
    pub up_curve: Curve,
    pub down_curve: Curve,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            up_period: 1.0,
            down_period: 1.0,
            velocity: 1.0,
            amplitude: 1.0,
            crest_wait: 0.0,
            trough_wait: 0.0,
            up_curve: Curve::default(),
            down_curve: Curve::default(),
        }
    }
}

impl WaveConfig {
    /// Read wave settings from tag parameters, falling back to `base` for anything absent.
    ///
    /// Every key may carry `key_prefix`, so one tag can hold several waves
    /// (`<pulse up=1 fadeup=0.2>` with prefixes `""` and `"fade"`). Recognized keys:
    ///
    ///     up, uptime          up_period
    ///     down, downtime      down_period
    ///     crest, crestwait    crest_wait
    ///     trough, troughwait  trough_wait
    ///     amp, amplitude      amplitude
    ///     vel, velocity       velocity
    ///     upcurve             up_curve
    ///     downcurve           down_curve
    pub fn from_parameters(
        parameters: &ParameterMap,
        key_prefix: &str,
        base: &WaveConfig,
    ) -> Result<WaveConfig, ParameterError> {
        let f32_of = |aliases: &[&str], fallback: f32| -> Result<f32, ParameterError> {
            let keys: Vec<String> = aliases
                .iter()
                .map(|a| format!("{}{}", key_prefix, a))
                .collect();
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            Ok(parameters.f32_of(&keys)?.unwrap_or(fallback))
        };
        let curve_of = |alias: &str, fallback: Curve| -> Result<Curve, ParameterError> {
            let key = format!("{}{}", key_prefix, alias);
            match parameters.get(&key) {
                None => Ok(fallback),
                Some(value) => value.parse().map_err(|_| ParameterError::Invalid {
                    key,
                    value: value.to_string(),
                    expected: "curve",
                }),
            }
        };

        Ok(WaveConfig {
            up_period: f32_of(&["up", "uptime"], base.up_period)?,
            down_period: f32_of(&["down", "downtime"], base.down_period)?,
            velocity: f32_of(&["vel", "velocity"], base.velocity)?,
            amplitude: f32_of(&["amp", "amplitude"], base.amplitude)?,
            crest_wait: f32_of(&["crest", "crestwait"], base.crest_wait)?,
            trough_wait: f32_of(&["trough", "troughwait"], base.trough_wait)?,
            up_curve: curve_of("upcurve", base.up_curve)?,
            down_curve: curve_of("downcurve", base.down_curve)?,
        })
    }
}

impl ParameterMap {
    /// Shorthand for [WaveConfig::from_parameters] on this map.
    pub fn wave_parameters(
        &self,
        key_prefix: &str,
        base: &WaveConfig,
    ) -> Result<WaveConfig, ParameterError> {
        WaveConfig::from_parameters(self, key_prefix, base)
    }
}

/// Shape of a cycle, decided by which holds are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveMode {
    /// Rise, fall.
    Wave,
    /// Rise, fall, hold at the trough.
    Pulse,
    /// Rise, hold at the crest, fall.
    InvertedPulse,
    /// Rise, hold at the crest, fall, hold at the trough.
    OneDirectionalPulse,
}

/// Which edge of a hold counts as passing an extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtremaTiming {
    /// When the wave reaches the crest or trough.
    #[default]
    Early,
    /// When the wave leaves the crest or trough.
    Late,
}

/// A validated wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wave {
    config: WaveConfig,
}

impl Default for Wave {
    fn default() -> Self {
        Self {
            config: WaveConfig::default(),
        }
    }
}

/// Segment durations in phase units.
#[derive(Debug, Clone, Copy)]
struct Cycle {
    up: f32,
    crest: f32,
    down: f32,
    trough: f32,
}

impl Cycle {
    fn len(&self) -> f32 {
        self.up + self.crest + self.down + self.trough
    }
}

impl Wave {
    pub fn new(config: WaveConfig) -> Result<Self, WaveError> {
        let fields = [
            ("up_period", config.up_period),
            ("down_period", config.down_period),
            ("velocity", config.velocity),
            ("amplitude", config.amplitude),
            ("crest_wait", config.crest_wait),
            ("trough_wait", config.trough_wait),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, value)| !value.is_finite()) {
            return Err(WaveError::NonFinite { field });
        }
        if config.up_period < 0.0 || config.down_period < 0.0 {
            return Err(WaveError::NegativePeriod {
                up: config.up_period,
                down: config.down_period,
            });
        }
        if config.up_period + config.down_period <= 0.0 {
            return Err(WaveError::ZeroCycle);
        }
        if config.velocity < 0.0 {
            return Err(WaveError::NegativeVelocity(config.velocity));
        }
        for (field, value) in [
            ("crest_wait", config.crest_wait),
            ("trough_wait", config.trough_wait),
        ] {
            if value < 0.0 {
                return Err(WaveError::NegativeWait { field, value });
            }
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn mode(&self) -> WaveMode {
        match (self.config.crest_wait > 0.0, self.config.trough_wait > 0.0) {
            (false, false) => WaveMode::Wave,
            (false, true) => WaveMode::Pulse,
            (true, false) => WaveMode::InvertedPulse,
            (true, true) => WaveMode::OneDirectionalPulse,
        }
    }

    /// Length of one cycle in phase units.
    pub fn effective_period(&self) -> f32 {
        self.cycle().len()
    }

    /// Value and direction at `time` for a character with phase `offset`.
    ///
    /// The sign is `1` while rising or holding at the crest, `-1` while falling or holding
    /// at the trough.
    pub fn evaluate(&self, time: f32, offset: f32) -> (f32, i32) {
        let cycle = self.cycle();
        let phase = self.phase(time, offset).rem_euclid(cycle.len());

        let (value, sign) = if phase < cycle.up {
            (self.config.up_curve.evaluate(phase / cycle.up), 1)
        } else if phase < cycle.up + cycle.crest {
            (1.0, 1)
        } else if phase < cycle.up + cycle.crest + cycle.down {
            let x = (phase - cycle.up - cycle.crest) / cycle.down;
            (1.0 - self.config.down_curve.evaluate(x), -1)
        } else {
            (0.0, -1)
        };
        (self.config.amplitude * value, sign)
    }

    /// Whether an extremum was passed during the `delta` seconds before `time`.
    ///
    /// Returns `1` for a crest, `-1` for a trough and `0` for neither. When both were
    /// passed, which is always the case once `delta` spans a full cycle, the one passed
    /// last wins. A frozen wave (velocity zero) never passes anything.
    pub fn passed_extrema(&self, time: f32, delta: f32, offset: f32, timing: ExtremaTiming) -> i32 {
        if self.config.velocity == 0.0 || delta <= 0.0 {
            return 0;
        }
        let cycle = self.cycle();
        let len = cycle.len();
        let current = self.phase(time, offset);
        let previous = self.phase(time - delta, offset);

        let (crest, trough) = match timing {
            ExtremaTiming::Early => (cycle.up, cycle.up + cycle.crest + cycle.down),
            ExtremaTiming::Late => (cycle.up + cycle.crest, 0.0),
        };
        // Latest occurrence of a boundary at or before the current phase.
        let latest = |boundary: f32| ((current - boundary) / len).floor() * len + boundary;
        let crest_at = latest(crest);
        let trough_at = latest(trough);

        match (crest_at > previous, trough_at > previous) {
            (true, true) if trough_at > crest_at => -1,
            (true, _) => 1,
            (false, true) => -1,
            (false, false) => 0,
        }
    }

    fn phase(&self, time: f32, offset: f32) -> f32 {
        time * self.config.velocity + offset
    }

    fn cycle(&self) -> Cycle {
        let scale = if self.config.velocity == 0.0 {
            1.0
        } else {
            self.config.velocity
        };
        Cycle {
            up: self.config.up_period * scale,
            crest: self.config.crest_wait * scale,
            down: self.config.down_period * scale,
            trough: self.config.trough_wait * scale,
        }
    }
}

impl TryFrom<WaveConfig> for Wave {
    type Error = WaveError;

    fn try_from(config: WaveConfig) -> Result<Self, Self::Error> {
        Wave::new(config)
    }
}
