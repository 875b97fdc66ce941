//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to the console, forward to a
//! status channel, record them in a test.

use crate::control::yap::ControlConfig;
use crate::error::ConfigError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// A measurement moved the duty cycle.
    DutyCycleChanged {
        from: f64,
        to: f64,
        process_value: f64,
    },

    /// A settings update was accepted.
    SettingsApplied(ControlConfig),

    /// A settings update was refused; the previous config stays active.
    SettingsRejected(ConfigError),

    /// External power level override received.
    PowerOverride(f64),

    /// A shutdown command was accepted.
    ShutdownRequested,

    /// The application service has started (carries initial duty).
    Started(f64),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub duty_cycle: f64,
    pub process_value: Option<f64>,
    pub target_pv: f64,
    pub power_override: Option<f64>,
    pub tick_count: u64,
}
