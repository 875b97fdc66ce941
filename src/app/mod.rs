//! Application core: pure domain logic, zero I/O.
//!
//! Wraps the duty-cycle [`ControlLaw`](crate::control::yap::ControlLaw)
//! with command handling, actuator hand-off and telemetry.  All
//! interaction with the outside world happens through **port traits**
//! defined in [`ports`], keeping this layer testable without sockets or
//! real actuators.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
