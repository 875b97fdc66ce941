//! Poll loop: the single thread that owns everything.
//!
//! Each iteration:
//! 1. receive at most one datagram through the [`CommandGateway`]
//! 2. queue a control tick, and a telemetry tick when one is due
//! 3. drain the [`EventQueue`] into the [`AppService`]
//!
//! A `Shutdown` command ends the loop and releases the command socket.

use std::time::Duration;

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{ActuatorPort, EventSink};
use crate::app::service::AppService;
use crate::config::SystemConfig;
use crate::events::{Event, EventQueue};
use crate::rpc::gateway::CommandGateway;
use crate::rpc::transport::Transport;

pub struct Poller<T: Transport, A: ActuatorPort, S: EventSink> {
    gateway: CommandGateway<T>,
    app: AppService,
    hw: A,
    sink: S,
    queue: EventQueue,
    poll_interval: Duration,
    telemetry_every: u32,
    telemetry_counter: u32,
    running: bool,
}

impl<T: Transport, A: ActuatorPort, S: EventSink> Poller<T, A, S> {
    pub fn new(
        config: &SystemConfig,
        gateway: CommandGateway<T>,
        app: AppService,
        hw: A,
        sink: S,
    ) -> Self {
        Self {
            gateway,
            app,
            hw,
            sink,
            queue: EventQueue::new(),
            poll_interval: Duration::from_millis(u64::from(config.poll_interval_ms)),
            telemetry_every: config.telemetry_every_polls(),
            telemetry_counter: 0,
            running: false,
        }
    }

    /// Drive the initial duty cycle and mark the loop as running.
    pub fn start(&mut self) {
        self.app.start(&mut self.hw, &mut self.sink);
        self.running = true;
    }

    /// Run one iteration.  Returns `false` once the loop has stopped.
    pub fn poll_once(&mut self) -> bool {
        if !self.running {
            return false;
        }

        if let Some(cmd) = self.gateway.poll() {
            self.queue.push(Event::Command(cmd));
        }
        self.queue.push(Event::ControlTick);

        self.telemetry_counter += 1;
        if self.telemetry_counter >= self.telemetry_every {
            self.queue.push(Event::TelemetryTick);
            self.telemetry_counter = 0;
        }

        let Self {
            queue,
            app,
            hw,
            sink,
            ..
        } = self;
        queue.drain(|event| dispatch(event, app, hw, sink));

        if self.app.is_shutdown_requested() {
            self.gateway.shutdown();
            self.running = false;
            info!("Poll loop stopped");
        }
        self.running
    }

    /// Start, then poll until shut down, sleeping between iterations.
    pub fn run(&mut self) {
        self.start();
        info!(
            "Entering poll loop ({} ms interval)",
            self.poll_interval.as_millis()
        );
        while self.poll_once() {
            std::thread::sleep(self.poll_interval);
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn gateway(&self) -> &CommandGateway<T> {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut CommandGateway<T> {
        &mut self.gateway
    }

    pub fn actuator(&self) -> &A {
        &self.hw
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

fn dispatch(
    event: Event,
    app: &mut AppService,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
) {
    match event {
        Event::Command(cmd) => {
            app.handle_command(cmd, hw, sink);
        }
        Event::ControlTick => {
            app.tick(hw);
        }
        Event::TelemetryTick => {
            let t = app.build_telemetry();
            sink.emit(&AppEvent::Telemetry(t));
        }
    }
}
