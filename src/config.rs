//! System configuration parameters
//!
//! All tunable parameters for the controller process.  Values can be
//! loaded from a JSON file and overridden on the command line; at run
//! time the control-law fields are reshaped by `update_settings` commands.

use serde::{Deserialize, Serialize};

use crate::control::yap::ControlConfig;
use crate::error::ConfigError;

/// UDP port the command gateway listens on.
pub const DEFAULT_UDP_PORT: u16 = 5010;

/// Command gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Local address to bind
    pub bind_addr: String,
    /// UDP port for JSON-RPC datagrams
    pub udp_port: u16,
    /// Largest datagram accepted (bytes); longer ones are truncated
    pub recv_buffer_len: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            udp_port: DEFAULT_UDP_PORT,
            recv_buffer_len: 2000,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Control law ---
    /// Set-point, control range and clip factors
    pub control: ControlConfig,
    /// Duty cycle (0-100%) the controller starts from
    pub initial_duty_cycle: f64,

    // --- Commands ---
    pub gateway: GatewayConfig,

    // --- Timing ---
    /// Poll loop interval (milliseconds)
    pub poll_interval_ms: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Control law
            control: ControlConfig::default(),
            initial_duty_cycle: 30.0,

            // Commands
            gateway: GatewayConfig::default(),

            // Timing
            poll_interval_ms: 100,       // 10 Hz
            telemetry_interval_secs: 10, // 6/min
        }
    }
}

impl SystemConfig {
    /// Reject values the controller or the poll loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.control.validate()?;
        if !self.initial_duty_cycle.is_finite() {
            return Err(ConfigError::NonFinite("initial_duty_cycle"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("poll_interval_ms"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("telemetry_interval_secs"));
        }
        Ok(())
    }

    /// Number of poll iterations between telemetry reports (at least 1).
    pub fn telemetry_every_polls(&self) -> u32 {
        let interval_ms = self.telemetry_interval_secs.saturating_mul(1000);
        (interval_ms / self.poll_interval_ms.max(1)).max(1)
    }
}
