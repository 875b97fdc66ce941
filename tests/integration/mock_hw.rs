//! Mock adapters for integration tests.
//!
//! Records every actuator call and emitted event so tests can assert on
//! the full history, and replays scripted datagrams in place of a socket.

use std::collections::VecDeque;

use yapctl::app::events::AppEvent;
use yapctl::app::ports::{ActuatorPort, EventSink};
use yapctl::error::CommsError;
use yapctl::rpc::transport::Transport;

/// Route `log` output through the test harness.  Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetDutyCycle(f64),
    SetPowerOverride(f64),
    AllOff,
}

// ── MockActuator ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockActuator {
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }

    /// Most recent duty cycle written, `None` if switched off since.
    pub fn duty_cycle(&self) -> Option<f64> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::SetDutyCycle(d) => Some(Some(*d)),
            ActuatorCall::AllOff => Some(None),
            ActuatorCall::SetPowerOverride(_) => None,
        })?
    }
}

impl ActuatorPort for MockActuator {
    fn set_duty_cycle(&mut self, duty: f64) {
        self.calls.push(ActuatorCall::SetDutyCycle(duty));
    }

    fn set_power_override(&mut self, level: f64) {
        self.calls.push(ActuatorCall::SetPowerOverride(level));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ScriptedTransport ─────────────────────────────────────────

/// Yields queued datagrams one per `recv`, then nothing.
#[derive(Default)]
pub struct ScriptedTransport {
    datagrams: VecDeque<Vec<u8>>,
    closed: bool,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new<I, D>(datagrams: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        Self {
            datagrams: datagrams.into_iter().map(|d| d.as_ref().to_vec()).collect(),
            closed: false,
        }
    }

    pub fn push(&mut self, datagram: &str) {
        self.datagrams.push_back(datagram.as_bytes().to_vec());
    }

    pub fn pending(&self) -> usize {
        self.datagrams.len()
    }
}

impl Transport for ScriptedTransport {
    type Error = CommsError;

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, CommsError> {
        if self.closed {
            return Err(CommsError::Closed);
        }
        let Some(datagram) = self.datagrams.pop_front() else {
            return Ok(0);
        };
        let len = datagram.len().min(buf.len());
        buf[..len].copy_from_slice(&datagram[..len]);
        Ok(len)
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_open(&self) -> bool {
        !self.closed
    }
}
