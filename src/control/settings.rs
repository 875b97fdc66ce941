//! Sparse settings update for the control law.
//!
//! Every field is optional: an absent field leaves the current value in
//! place, so `Some(0.0)` is always distinguishable from "not given".

use serde::{Deserialize, Serialize};

/// Partial update merged into the live [`ControlConfig`](super::yap::ControlConfig).
///
/// `clip_factor` is applied to both sides before `clip_factor_low` /
/// `clip_factor_high`, so the side-specific fields win when both appear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSettings {
    /// Manual duty-cycle override (bypasses the law).
    pub duty_cycle: Option<f64>,
    pub target_pv: Option<f64>,
    pub control_range_low: Option<f64>,
    pub control_range_high: Option<f64>,
    pub clip_factor: Option<f64>,
    pub clip_factor_low: Option<f64>,
    pub clip_factor_high: Option<f64>,
}

impl PartialSettings {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Override only the duty cycle.
    pub fn duty_cycle(duty: f64) -> Self {
        Self {
            duty_cycle: Some(duty),
            ..Self::default()
        }
    }
}
