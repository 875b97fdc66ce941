//! Asymmetric tangent-shaped duty-cycle controller.
//!
//! Not a PID: there is no integral or derivative term.  Each new process
//! value moves the duty cycle from its *current* value toward a bound by a
//! fraction of the remaining headroom.  The fraction comes from a tangent
//! curve whose steepness is set per side by a clip factor.
//!
//! ```text
//!  duty
//!  100 ┤━━━━━━┓
//!      │       ╲            below target: d + (100 - d) · shape
//!    d ┤        ╲━━━━━━━┓
//!      │                 ╲  above target: d - d · shape
//!    0 ┤                  ┗━━━━━━
//!      └──────┬──────┬──────┬──────▶ pv
//!            low   target  high
//! ```
//!
//! `shape = tan(half_angle · frac) / tan(half_angle)` where
//! `half_angle = π/2 · clip_factor` and `frac` is the normalised distance
//! from the target toward the bound on that side.

use core::f64::consts::FRAC_PI_2;
use core::fmt;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Side};

use super::curve::Curve;
use super::settings::PartialSettings;

/// Fully-off duty cycle.
pub const DUTY_MIN: f64 = 0.0;
/// Fully-on duty cycle.
pub const DUTY_MAX: f64 = 100.0;

/// Clip factor used for both sides when none is configured.
pub const DEFAULT_CLIP_FACTOR: f64 = 0.9;

// ───────────────────────────────────────────────────────────────
// Configuration
// ───────────────────────────────────────────────────────────────

/// Set-point, saturation range and per-side curve steepness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Desired process value.
    pub target_pv: f64,
    /// At or below this process value the output is fully on.
    pub control_range_low: f64,
    /// At or above this process value the output is fully off.
    pub control_range_high: f64,
    /// Steepness below the target, in (0, 1).
    pub clip_factor_low: f64,
    /// Steepness above the target, in (0, 1).
    pub clip_factor_high: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::new(225.0, 200.0, 235.0)
    }
}

impl ControlConfig {
    /// Config with the default clip factors on both sides.
    pub fn new(target_pv: f64, control_range_low: f64, control_range_high: f64) -> Self {
        Self {
            target_pv,
            control_range_low,
            control_range_high,
            clip_factor_low: DEFAULT_CLIP_FACTOR,
            clip_factor_high: DEFAULT_CLIP_FACTOR,
        }
    }

    /// Check every invariant the control law depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("target_pv", self.target_pv),
            ("control_range_low", self.control_range_low),
            ("control_range_high", self.control_range_high),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(field));
            }
        }

        if !(self.control_range_low < self.target_pv && self.target_pv < self.control_range_high) {
            return Err(ConfigError::RangeOrder {
                low: self.control_range_low,
                target: self.target_pv,
                high: self.control_range_high,
            });
        }

        check_clip_factor(Side::Low, self.clip_factor_low)?;
        check_clip_factor(Side::High, self.clip_factor_high)
    }

    /// Merge a partial update over this config.  Does not validate.
    pub fn merged(&self, update: &PartialSettings) -> Self {
        let mut next = *self;
        if let Some(v) = update.target_pv {
            next.target_pv = v;
        }
        if let Some(v) = update.control_range_low {
            next.control_range_low = v;
        }
        if let Some(v) = update.control_range_high {
            next.control_range_high = v;
        }
        if let Some(v) = update.clip_factor {
            next.clip_factor_low = v;
            next.clip_factor_high = v;
        }
        if let Some(v) = update.clip_factor_low {
            next.clip_factor_low = v;
        }
        if let Some(v) = update.clip_factor_high {
            next.clip_factor_high = v;
        }
        next
    }
}

fn check_clip_factor(side: Side, value: f64) -> Result<(), ConfigError> {
    // Written so that NaN fails too.
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ClipFactorOutOfRange { side, value })
    }
}

fn checked_duty(duty: f64) -> Result<f64, ConfigError> {
    if duty.is_finite() {
        Ok(duty.clamp(DUTY_MIN, DUTY_MAX))
    } else {
        Err(ConfigError::NonFinite("duty_cycle"))
    }
}

// ───────────────────────────────────────────────────────────────
// Derived shaping constants
// ───────────────────────────────────────────────────────────────

/// Trigonometric constants derived from the clip factors.
///
/// Both half-angles lie strictly inside (0, π/2) for a validated config,
/// so both normalisers are finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedShape {
    pub half_angle_low: f64,
    pub tan_norm_low: f64,
    pub half_angle_high: f64,
    pub tan_norm_high: f64,
}

impl DerivedShape {
    pub fn from_config(config: &ControlConfig) -> Self {
        let half_angle_low = FRAC_PI_2 * config.clip_factor_low;
        let half_angle_high = FRAC_PI_2 * config.clip_factor_high;
        Self {
            half_angle_low,
            tan_norm_low: 1.0 / half_angle_low.tan(),
            half_angle_high,
            tan_norm_high: 1.0 / half_angle_high.tan(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// ControlLaw
// ───────────────────────────────────────────────────────────────

/// Stateful controller: configuration, shaping constants, last process
/// value and current duty cycle.
///
/// Single owner.  If shared between threads, wrap it so that
/// [`apply_settings`](Self::apply_settings) and
/// [`update_process_value`](Self::update_process_value) are serialised:
/// the output depends on the order of updates.
#[derive(Debug, Clone)]
pub struct ControlLaw {
    config: ControlConfig,
    shape: DerivedShape,
    process_value: Option<f64>,
    duty_cycle: f64,
}

impl ControlLaw {
    /// Build a controller starting at `initial_duty` with no process value.
    pub fn new(config: ControlConfig, initial_duty: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        let duty_cycle = checked_duty(initial_duty)?;
        info!(
            "ControlLaw: low={} target={} high={} clip={}/{} duty={:.1}%",
            config.control_range_low,
            config.target_pv,
            config.control_range_high,
            config.clip_factor_low,
            config.clip_factor_high,
            duty_cycle,
        );
        Ok(Self {
            shape: DerivedShape::from_config(&config),
            config,
            process_value: None,
            duty_cycle,
        })
    }

    /// Merge `update` into the configuration and recompute the shape.
    ///
    /// A present `duty_cycle` overrides the current duty directly.  On
    /// error nothing changes: neither the config nor the duty cycle.
    pub fn apply_settings(&mut self, update: &PartialSettings) -> Result<(), ConfigError> {
        let candidate = self.config.merged(update);
        candidate.validate()?;
        let duty_override = update.duty_cycle.map(checked_duty).transpose()?;

        if candidate != self.config {
            debug!("ControlLaw: config {:?} -> {:?}", self.config, candidate);
        }
        self.config = candidate;
        self.shape = DerivedShape::from_config(&self.config);

        if let Some(duty) = duty_override {
            debug!("ControlLaw: duty override {:.2}% -> {:.2}%", self.duty_cycle, duty);
            self.duty_cycle = duty;
        }
        Ok(())
    }

    /// Feed a new measurement and return the resulting duty cycle.
    ///
    /// A value equal to the last one is ignored, so retransmitted
    /// measurements do not keep pushing the output toward a bound.
    pub fn update_process_value(&mut self, pv: f64) -> f64 {
        if pv.is_nan() {
            warn!("ControlLaw: NaN process value ignored");
            return self.duty_cycle;
        }
        if self.process_value == Some(pv) {
            return self.duty_cycle;
        }
        self.process_value = Some(pv);
        self.duty_cycle = self.evaluate(pv);
        self.duty_cycle
    }

    /// Duty cycle that `pv` would produce from the current duty, without
    /// storing anything.
    pub fn evaluate(&self, pv: f64) -> f64 {
        self.response(pv, self.duty_cycle)
    }

    /// Duty cycle that `pv` would produce starting from `duty`.
    pub fn response(&self, pv: f64, duty: f64) -> f64 {
        let c = &self.config;
        if pv <= c.control_range_low {
            return DUTY_MAX;
        }
        if pv >= c.control_range_high {
            return DUTY_MIN;
        }

        let shape = self.shaping_fraction(pv);
        let next = if pv < c.target_pv {
            duty + (DUTY_MAX - duty) * shape
        } else {
            duty - duty * shape
        };
        next.clamp(DUTY_MIN, DUTY_MAX)
    }

    /// Tangent-derived blend coefficient for `pv`.
    ///
    /// 0 at the target, rising toward 1 at either bound; exactly 1 at or
    /// beyond the bounds.
    pub fn shaping_fraction(&self, pv: f64) -> f64 {
        let c = &self.config;
        if pv <= c.control_range_low || pv >= c.control_range_high {
            return 1.0;
        }

        if pv < c.target_pv {
            let frac = (c.target_pv - pv) / (c.target_pv - c.control_range_low);
            (self.shape.half_angle_low * frac).tan() * self.shape.tan_norm_low
        } else {
            let frac = (pv - c.target_pv) / (c.control_range_high - c.target_pv);
            (self.shape.half_angle_high * frac).tan() * self.shape.tan_norm_high
        }
    }

    /// Lazily sample the response curve over `[start, end]`.
    ///
    /// Every point is evaluated against the current duty cycle; the
    /// controller is borrowed immutably, so sampling cannot change it.
    pub fn sample_curve(&self, start: f64, end: f64, step: f64) -> Result<Curve<'_>, ConfigError> {
        Curve::new(self, start, end, step)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    /// Last stored measurement, `None` before the first update.
    pub fn process_value(&self) -> Option<f64> {
        self.process_value
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn shape(&self) -> &DerivedShape {
        &self.shape
    }
}

impl fmt::Display for ControlLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current settings")?;
        writeln!(f, "  low:           {}", self.config.control_range_low)?;
        writeln!(f, "  target:        {}", self.config.target_pv)?;
        writeln!(f, "  high:          {}", self.config.control_range_high)?;
        match self.process_value {
            Some(pv) => writeln!(f, "  process_value: {pv}")?,
            None => writeln!(f, "  process_value: none")?,
        }
        write!(f, "  duty_cycle:    {:.2}", self.duty_cycle)
    }
}
