//! Command gateway: turns inbound datagrams into [`AppCommand`]s.
//!
//! Two wire forms are accepted:
//!
//! ```text
//! {"jsonrpc": "2.0", "method": "set_process_value",
//!  "params": {"power_level": 42.2}, "id": 1}
//!
//! GET /?power_level=42.2 HTTP/1.1
//! ```
//!
//! | method              | params                                    |
//! |---------------------|-------------------------------------------|
//! | `set_process_value` | `power_level` (number or numeric string)  |
//! | `set_power_level`   | alias of `set_process_value`              |
//! | `update_settings`   | partial settings, `current_temperature`   |
//! | `shutdown`          | ignored (but must be present)             |
//!
//! `jsonrpc`, `method` and `params` are required; `id` is ignored.  No
//! reply is ever sent.  Anything that fails to decode is logged and
//! dropped here; it never reaches the application service.

use log::{debug, warn};
use serde_json::Value;

use crate::app::commands::{AppCommand, SettingsUpdate};
use crate::control::settings::PartialSettings;
use crate::error::DecodeError;

use super::transport::Transport;

/// Counters for datagrams seen by the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayStats {
    pub received: u32,
    pub decoded: u32,
    pub dropped: u32,
}

/// Polls a transport and decodes one datagram per call.
pub struct CommandGateway<T: Transport> {
    transport: T,
    buf: Vec<u8>,
    stats: GatewayStats,
}

impl<T: Transport> CommandGateway<T> {
    pub fn new(transport: T, recv_buffer_len: usize) -> Self {
        Self {
            transport,
            buf: vec![0; recv_buffer_len.max(1)],
            stats: GatewayStats::default(),
        }
    }

    /// Receive at most one datagram and decode it.
    ///
    /// Returns `None` when nothing is pending, the transport failed, or
    /// the datagram was malformed.
    pub fn poll(&mut self) -> Option<AppCommand> {
        if !self.transport.is_open() {
            return None;
        }

        let len = match self.transport.recv(&mut self.buf) {
            Ok(0) => return None,
            Ok(len) => len,
            Err(e) => {
                warn!("GW: transport error: {}", e);
                return None;
            }
        };
        self.stats.received += 1;

        match decode_datagram(&self.buf[..len]) {
            Ok(cmd) => {
                self.stats.decoded += 1;
                debug!("GW: {:?}", cmd);
                Some(cmd)
            }
            Err(e) => {
                self.stats.dropped += 1;
                warn!("GW: dropped datagram: {}", e);
                None
            }
        }
    }

    /// Release the transport.  Subsequent polls return `None`.
    pub fn shutdown(&mut self) {
        self.transport.close();
    }

    pub fn stats(&self) -> GatewayStats {
        self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

// ───────────────────────────────────────────────────────────────
// Decoding
// ───────────────────────────────────────────────────────────────

/// Decode one raw datagram (JSON-RPC object or `GET` query line).
pub fn decode_datagram(data: &[u8]) -> Result<AppCommand, DecodeError> {
    let text = core::str::from_utf8(data).map_err(|_| DecodeError::NotUtf8)?;
    let trimmed = text.trim_start();
    if trimmed.starts_with("GET ") {
        return decode_query(trimmed);
    }
    let request: Value = serde_json::from_str(text).map_err(|_| DecodeError::MalformedJson)?;
    decode_request(&request)
}

/// Decode an already-parsed JSON-RPC request.
pub fn decode_request(request: &Value) -> Result<AppCommand, DecodeError> {
    let obj = request.as_object().ok_or(DecodeError::MalformedJson)?;
    for member in ["jsonrpc", "method", "params"] {
        if !obj.contains_key(member) {
            return Err(DecodeError::MissingMember(member));
        }
    }

    let params = &obj["params"];
    match obj["method"].as_str() {
        Some("set_process_value" | "set_power_level") => decode_power_level(params),
        Some("update_settings") => decode_settings(params),
        Some("shutdown") => Ok(AppCommand::Shutdown),
        _ => Err(DecodeError::UnknownMethod),
    }
}

/// Decode the request line of an HTTP `GET`, e.g. `GET /?power_level=42.2 HTTP/1.1`.
pub fn decode_query(text: &str) -> Result<AppCommand, DecodeError> {
    let target = text
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or(DecodeError::UnrecognisedQuery)?;
    let (_, query) = target.split_once('?').ok_or(DecodeError::UnrecognisedQuery)?;

    for pair in query.split('&') {
        if let Some(("power_level", raw)) = pair.split_once('=') {
            let level = parse_number(raw).ok_or(DecodeError::NotNumeric("power_level"))?;
            return Ok(AppCommand::SetPowerLevel(round_tenth(level)));
        }
    }
    Err(DecodeError::UnrecognisedQuery)
}

fn decode_power_level(params: &Value) -> Result<AppCommand, DecodeError> {
    let raw = params
        .get("power_level")
        .ok_or(DecodeError::MissingParam("power_level"))?;
    let level = number_param(raw, "power_level")?;
    Ok(AppCommand::SetPowerLevel(round_tenth(level)))
}

fn decode_settings(params: &Value) -> Result<AppCommand, DecodeError> {
    if !params.is_object() {
        return Err(DecodeError::InvalidSettings);
    }

    let current_temperature = params
        .get("current_temperature")
        .map(|raw| number_param(raw, "current_temperature"))
        .transpose()?;
    let settings: PartialSettings =
        serde_json::from_value(params.clone()).map_err(|_| DecodeError::InvalidSettings)?;

    Ok(AppCommand::UpdateSettings(SettingsUpdate {
        settings,
        current_temperature,
        temperature_update: current_temperature.is_some(),
    }))
}

/// A JSON number, or a string holding one.
fn number_param(raw: &Value, name: &'static str) -> Result<f64, DecodeError> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    };
    value.ok_or(DecodeError::NotNumeric(name))
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
