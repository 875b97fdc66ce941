//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (actuator drivers, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them
//! via generics, so the domain core never touches hardware directly.

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the actuator.
pub trait ActuatorPort {
    /// Drive the actuator at `duty` percent (0–100).
    fn set_duty_cycle(&mut self, duty: f64);

    /// Publish an externally-requested power level.
    fn set_power_override(&mut self, level: f64);

    /// Switch the actuator off for a safe shutdown.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
