//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to        |
//! |------------|--------------|--------------------|
//! | `actuator` | ActuatorPort | Log output         |
//! | `log_sink` | EventSink    | Log output         |

pub mod actuator;
pub mod log_sink;
