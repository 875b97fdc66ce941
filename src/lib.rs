//! yapctl: asymmetric tangent-shaped duty-cycle controller.
//!
//! Exposes the control law, the command gateway and the poll loop for
//! the binary, integration tests and fuzzing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod poller;
pub mod rpc;
