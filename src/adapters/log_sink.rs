//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr via `env_logger` in the binary).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let pv = t
                    .process_value
                    .map_or_else(|| "-".to_string(), |pv| format!("{pv:.1}"));
                let power = t
                    .power_override
                    .map_or_else(|| "-".to_string(), |p| format!("{p:.1}"));
                info!(
                    "TELEM | duty={:.2}% | pv={} target={:.1} | power={} | ticks={}",
                    t.duty_cycle, pv, t.target_pv, power, t.tick_count,
                );
            }
            AppEvent::DutyCycleChanged {
                from,
                to,
                process_value,
            } => {
                info!("DUTY  | {:.2}% -> {:.2}% at pv={:.1}", from, to, process_value);
            }
            AppEvent::SettingsApplied(c) => {
                info!(
                    "CONFIG| target={} range=[{}, {}] clip=({}, {})",
                    c.target_pv,
                    c.control_range_low,
                    c.control_range_high,
                    c.clip_factor_low,
                    c.clip_factor_high,
                );
            }
            AppEvent::SettingsRejected(e) => {
                warn!("CONFIG| rejected: {}", e);
            }
            AppEvent::PowerOverride(level) => {
                info!("POWER | override={:.1}", level);
            }
            AppEvent::ShutdownRequested => {
                info!("STOP  | shutdown requested");
            }
            AppEvent::Started(duty) => {
                info!("START | initial_duty={:.1}%", duty);
            }
        }
    }
}
