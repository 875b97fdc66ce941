//! Log-only actuator adapter.
//!
//! Stands in for a real heater driver: every write is logged and the
//! last commanded values are kept for status queries.

use log::info;

use crate::app::ports::ActuatorPort;

/// Actuator that records and logs what it is told to do.
#[derive(Debug, Default)]
pub struct LogActuator {
    duty_cycle: Option<f64>,
    power_override: Option<f64>,
}

impl LogActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last duty cycle written, `None` before the first write or after `all_off`.
    pub fn duty_cycle(&self) -> Option<f64> {
        self.duty_cycle
    }

    pub fn power_override(&self) -> Option<f64> {
        self.power_override
    }
}

impl ActuatorPort for LogActuator {
    fn set_duty_cycle(&mut self, duty: f64) {
        info!("ACT   | duty_cycle={:.2}%", duty);
        self.duty_cycle = Some(duty);
    }

    fn set_power_override(&mut self, level: f64) {
        info!("ACT   | power_level={:.1}", level);
        self.power_override = Some(level);
    }

    fn all_off(&mut self) {
        info!("ACT   | off");
        self.duty_cycle = None;
        self.power_override = None;
    }
}
