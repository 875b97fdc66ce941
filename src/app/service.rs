//! Application service, the hexagonal core.
//!
//! [`AppService`] owns the [`ControlLaw`] and the externally-set power
//! override.  It exposes a hardware-agnostic API; all I/O flows through
//! port traits injected at call sites, so the service is testable with
//! mock adapters.
//!
//! ```text
//!  AppCommand ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//! ActuatorPort ◀──│  ControlLaw · override  │
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::settings::PartialSettings;
use crate::control::yap::ControlLaw;
use crate::error::ConfigError;

use super::commands::{AppCommand, SettingsUpdate};
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, EventSink};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    law: ControlLaw,
    /// Last power level received through `SetPowerLevel`.
    power_override: Option<f64>,
    /// Duty cycle last written to the actuator, if any.
    applied_duty: Option<f64>,
    tick_count: u64,
    shutdown_requested: bool,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the actuator; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig) -> Result<Self, ConfigError> {
        let law = ControlLaw::new(config.control, config.initial_duty_cycle)?;
        Ok(Self::with_law(law))
    }

    /// Wrap an already-built controller.
    pub fn with_law(law: ControlLaw) -> Self {
        Self {
            law,
            power_override: None,
            applied_duty: None,
            tick_count: 0,
            shutdown_requested: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Push the initial duty cycle to the actuator.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.apply_actuator(hw);
        sink.emit(&AppEvent::Started(self.law.duty_cycle()));
        info!("AppService started at {:.1}% duty", self.law.duty_cycle());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One poll-loop tick: keep the actuator in step with the law.
    pub fn tick(&mut self, hw: &mut impl ActuatorPort) {
        self.tick_count += 1;
        self.apply_actuator(hw);
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the gateway, tests, etc.).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::SetPowerLevel(level) => {
                if self.shutdown_requested {
                    warn!("Power level {:.1} ignored after shutdown", level);
                    return;
                }
                self.power_override = Some(level);
                hw.set_power_override(level);
                sink.emit(&AppEvent::PowerOverride(level));
            }
            AppCommand::UpdateSettings(update) => {
                self.update_settings(&update, hw, sink);
            }
            AppCommand::Shutdown => {
                if !self.shutdown_requested {
                    info!("Shutdown requested");
                    self.shutdown_requested = true;
                    hw.all_off();
                    self.applied_duty = None;
                    sink.emit(&AppEvent::ShutdownRequested);
                }
            }
        }
    }

    /// Apply a settings update, then deliver its measurement if it has one.
    ///
    /// A rejected settings update does not block the measurement: the
    /// process value is fed to the unchanged law.
    pub fn update_settings(
        &mut self,
        update: &SettingsUpdate,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if !update.settings.is_empty() {
            self.apply_settings(&update.settings, sink);
        }
        if update.temperature_update {
            if let Some(pv) = update.current_temperature {
                self.update_process_value(pv, hw, sink);
            }
        }
        self.apply_actuator(hw);
    }

    /// Feed one measurement through the law and drive the actuator.
    pub fn update_process_value(
        &mut self,
        pv: f64,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> f64 {
        let from = self.law.duty_cycle();
        let to = self.law.update_process_value(pv);
        if to != from {
            sink.emit(&AppEvent::DutyCycleChanged {
                from,
                to,
                process_value: pv,
            });
        }
        self.apply_actuator(hw);
        to
    }

    fn apply_settings(&mut self, settings: &PartialSettings, sink: &mut impl EventSink) {
        match self.law.apply_settings(settings) {
            Ok(()) => {
                info!("Settings applied");
                sink.emit(&AppEvent::SettingsApplied(*self.law.config()));
            }
            Err(e) => {
                warn!("Settings rejected: {}", e);
                sink.emit(&AppEvent::SettingsRejected(e));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            duty_cycle: self.law.duty_cycle(),
            process_value: self.law.process_value(),
            target_pv: self.law.config().target_pv,
            power_override: self.power_override,
            tick_count: self.tick_count,
        }
    }

    pub fn duty_cycle(&self) -> f64 {
        self.law.duty_cycle()
    }

    pub fn power_override(&self) -> Option<f64> {
        self.power_override
    }

    /// Read-only access to the controller (curve export, status).
    pub fn law(&self) -> &ControlLaw {
        &self.law
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    // ── Internal ──────────────────────────────────────────────

    /// Write the duty cycle to the actuator if it differs from the last write.
    fn apply_actuator(&mut self, hw: &mut impl ActuatorPort) {
        if self.shutdown_requested {
            return;
        }
        let duty = self.law.duty_cycle();
        if self.applied_duty != Some(duty) {
            hw.set_duty_cycle(duty);
            self.applied_duty = Some(duty);
        }
    }
}
