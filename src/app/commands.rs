//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (UDP gateway,
//! query strings, tests) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::control::settings::PartialSettings;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppCommand {
    /// Externally-set actuator power level, already rounded to 0.1.
    /// Published on its own channel; does not touch the control law.
    SetPowerLevel(f64),

    /// Reshape the control law and optionally deliver a measurement.
    UpdateSettings(SettingsUpdate),

    /// Stop the poll loop and release the command socket.
    Shutdown,
}

/// Payload of [`AppCommand::UpdateSettings`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsUpdate {
    pub settings: PartialSettings,
    /// Measured process value carried alongside the settings.
    pub current_temperature: Option<f64>,
    /// Whether `current_temperature` was present in the request.
    pub temperature_update: bool,
}

impl SettingsUpdate {
    /// Settings only, no measurement.
    pub fn settings(settings: PartialSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Measurement only, no settings change.
    pub fn temperature(value: f64) -> Self {
        Self {
            settings: PartialSettings::default(),
            current_temperature: Some(value),
            temperature_update: true,
        }
    }
}
