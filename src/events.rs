//! Poll-loop event queue.
//!
//! Events are produced by:
//! - The command gateway (decoded datagrams)
//! - The poll loop itself (control and telemetry ticks)
//!
//! Events are consumed by the same loop, one at a time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Gateway     │────▶│              │     │              │
//! │ Control tick│────▶│  EventQueue  │────▶│  AppService  │
//! │ Telemetry   │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use heapless::Deque;
use log::warn;

use crate::app::commands::AppCommand;

/// Maximum number of pending events.
pub const EVENT_QUEUE_CAP: usize = 32;

/// Work items for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Decoded command from the gateway.
    Command(AppCommand),
    /// Keep the actuator in step with the control law.
    ControlTick,
    /// Telemetry report is due.
    TelemetryTick,
}

/// Bounded FIFO of pending [`Event`]s.
#[derive(Default)]
pub struct EventQueue {
    events: Deque<Event, EVENT_QUEUE_CAP>,
    dropped: u32,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event.  Returns `false` if the queue is full (event dropped).
    pub fn push(&mut self, event: Event) -> bool {
        match self.events.push_back(event) {
            Ok(()) => true,
            Err(event) => {
                self.dropped += 1;
                warn!("Event queue full, dropped {:?}", event);
                false
            }
        }
    }

    /// Pop the oldest event, `None` if empty.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&mut self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Events dropped because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
