//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  Everything runs on the host; the only socket
//! used is bound to the loopback interface.

mod app_service_tests;
mod gateway_tests;
mod mock_hw;
mod poller_tests;
