//! Poll loop tests: gateway → queue → service → adapters, one iteration
//! at a time.

use crate::mock_hw::{init_logging, ActuatorCall, MockActuator, RecordingSink, ScriptedTransport};

use yapctl::app::events::AppEvent;
use yapctl::app::service::AppService;
use yapctl::config::SystemConfig;
use yapctl::poller::Poller;
use yapctl::rpc::gateway::CommandGateway;
use yapctl::rpc::transport::Transport;

type TestPoller = Poller<ScriptedTransport, MockActuator, RecordingSink>;

fn make_poller(config: &SystemConfig, datagrams: &[&str]) -> TestPoller {
    init_logging();
    let gateway = CommandGateway::new(ScriptedTransport::new(datagrams.iter().copied()), 2000);
    let app = AppService::new(config).unwrap();
    let mut poller = Poller::new(config, gateway, app, MockActuator::new(), RecordingSink::new());
    poller.start();
    poller
}

fn telemetry_count(p: &TestPoller) -> usize {
    p.sink().count(|e| matches!(e, AppEvent::Telemetry(_)))
}

#[test]
fn not_started_poller_does_nothing() {
    let config = SystemConfig::default();
    let gateway = CommandGateway::new(ScriptedTransport::default(), 2000);
    let app = AppService::new(&config).unwrap();
    let mut poller = Poller::new(&config, gateway, app, MockActuator::new(), RecordingSink::new());
    assert!(!poller.poll_once());
    assert!(poller.actuator().calls.is_empty());
}

#[test]
fn measurement_then_shutdown() {
    let config = SystemConfig::default();
    let mut poller = make_poller(
        &config,
        &[
            r#"{"jsonrpc": "2.0", "method": "update_settings", "params": {"current_temperature": 210}}"#,
            r#"{"jsonrpc": "2.0", "method": "shutdown", "params": {}}"#,
        ],
    );

    assert!(poller.poll_once());
    let duty = poller.app().duty_cycle();
    assert!((duty - 42.58).abs() < 0.01);
    assert_eq!(poller.actuator().duty_cycle(), Some(duty));

    assert!(!poller.poll_once());
    assert!(!poller.is_running());
    assert!(!poller.gateway().transport().is_open());
    assert_eq!(poller.actuator().last_call(), Some(&ActuatorCall::AllOff));
    assert!(poller.sink().events.contains(&AppEvent::ShutdownRequested));

    // Stays stopped.
    assert!(!poller.poll_once());
}

#[test]
fn idle_polls_count_ticks_and_report_telemetry() {
    let config = SystemConfig {
        poll_interval_ms: 500,
        telemetry_interval_secs: 1,
        ..SystemConfig::default()
    };
    assert_eq!(config.telemetry_every_polls(), 2);
    let mut poller = make_poller(&config, &[]);

    for _ in 0..5 {
        assert!(poller.poll_once());
    }
    assert_eq!(poller.app().tick_count(), 5);
    assert_eq!(telemetry_count(&poller), 2);
    // Unchanged duty is written once, at start.
    assert_eq!(poller.actuator().calls, vec![ActuatorCall::SetDutyCycle(30.0)]);

    let last = poller.sink().events.iter().rev().find_map(|e| match e {
        AppEvent::Telemetry(t) => Some(t.clone()),
        _ => None,
    });
    let last = last.unwrap();
    assert_eq!(last.tick_count, 4);
    assert_eq!(last.duty_cycle, 30.0);
    assert_eq!(last.process_value, None);
}

#[test]
fn commands_arriving_later_are_picked_up() {
    let config = SystemConfig::default();
    let mut poller = make_poller(&config, &[]);
    assert!(poller.poll_once());

    poller
        .gateway_mut()
        .transport_mut()
        .push(r#"{"jsonrpc": "2.0", "method": "set_power_level", "params": {"power_level": 12.34}}"#);
    assert!(poller.poll_once());

    assert_eq!(poller.app().power_override(), Some(12.3));
    assert!(poller.sink().events.contains(&AppEvent::PowerOverride(12.3)));
}
