//! Unified error types for the controller.
//!
//! A single `Error` enum that configuration and transport failures
//! convert into.  `DecodeError` never leaves the gateway, so it has no
//! conversion.  All variants are `Copy` so they
//! can be passed through the service and gateway without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// Controller configuration was rejected.
    Config(ConfigError),
    /// The command transport failed.
    Comms(CommsError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Which side of the set-point a clip factor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// A configuration value that would break the control law.
///
/// When one of these is returned the controller keeps its previous
/// configuration and duty cycle untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A field is NaN or infinite.  Carries the field name.
    NonFinite(&'static str),
    /// `control_range_low < target_pv < control_range_high` does not hold.
    RangeOrder { low: f64, target: f64, high: f64 },
    /// A clip factor lies outside the open interval (0, 1).
    ClipFactorOutOfRange { side: Side, value: f64 },
    /// Curve sampling step must be finite and strictly positive.
    InvalidStep(f64),
    /// The sampled range holds more points than can be counted.
    CurveTooLong,
    /// A timing field of the system configuration is zero.
    ZeroInterval(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(field) => write!(f, "{field} must be a finite number"),
            Self::RangeOrder { low, target, high } => write!(
                f,
                "expected control_range_low < target_pv < control_range_high, got {low} / {target} / {high}"
            ),
            Self::ClipFactorOutOfRange { side, value } => {
                write!(f, "clip_factor_{side} must be in (0, 1), got {value}")
            }
            Self::InvalidStep(step) => write!(f, "curve step must be > 0, got {step}"),
            Self::CurveTooLong => write!(f, "curve range is too long for its step"),
            Self::ZeroInterval(field) => write!(f, "{field} must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Decode errors
// ---------------------------------------------------------------------------

/// Malformed command payloads.  Never surfaces past the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Datagram is not valid UTF-8.
    NotUtf8,
    /// Payload is not a JSON object.
    MalformedJson,
    /// A required top-level member (`jsonrpc`, `method`, `params`) is absent.
    MissingMember(&'static str),
    /// `method` names nothing the gateway understands.
    UnknownMethod,
    /// A required parameter is absent.
    MissingParam(&'static str),
    /// A parameter is present but not numeric.
    NotNumeric(&'static str),
    /// `update_settings` params do not fit the settings schema.
    InvalidSettings,
    /// Query string has no recognised command.
    UnrecognisedQuery,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotUtf8 => write!(f, "payload is not UTF-8"),
            Self::MalformedJson => write!(f, "payload is not a JSON object"),
            Self::MissingMember(name) => write!(f, "'{name}' missing"),
            Self::UnknownMethod => write!(f, "unknown method"),
            Self::MissingParam(name) => write!(f, "parameter '{name}' missing"),
            Self::NotNumeric(name) => write!(f, "parameter '{name}' is not numeric"),
            Self::InvalidSettings => write!(f, "settings contain a non-numeric value"),
            Self::UnrecognisedQuery => write!(f, "query string carries no command"),
        }
    }
}

impl std::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Socket could not be bound to the configured address.
    BindFailed,
    /// Socket could not be switched to non-blocking mode.
    NonBlockingFailed,
    /// A receive call failed for a reason other than "no data".
    RecvFailed,
    /// The transport has already been closed.
    Closed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed => write!(f, "UDP bind failed"),
            Self::NonBlockingFailed => write!(f, "could not set socket non-blocking"),
            Self::RecvFailed => write!(f, "receive failed"),
            Self::Closed => write!(f, "transport closed"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
