//! Integration tests for the AppService → ControlLaw → actuator pipeline.
//!
//! Verify that commands arriving from the gateway reach the actuator and
//! the event sink in the right order, with no socket involved.

use crate::mock_hw::{init_logging, ActuatorCall, MockActuator, RecordingSink};

use yapctl::app::commands::{AppCommand, SettingsUpdate};
use yapctl::app::events::AppEvent;
use yapctl::app::service::AppService;
use yapctl::config::SystemConfig;
use yapctl::control::settings::PartialSettings;
use yapctl::control::yap::{ControlConfig, ControlLaw};
use yapctl::error::{ConfigError, Side};

fn make_app() -> (AppService, MockActuator, RecordingSink) {
    init_logging();
    let mut app = AppService::new(&SystemConfig::default()).unwrap();
    let mut hw = MockActuator::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn expected_duty(config: ControlConfig, pv: f64) -> f64 {
    let mut law = ControlLaw::new(config, 30.0).unwrap();
    law.update_process_value(pv)
}

#[test]
fn start_writes_initial_duty() {
    let (_app, hw, sink) = make_app();
    assert_eq!(hw.calls, vec![ActuatorCall::SetDutyCycle(30.0)]);
    assert_eq!(sink.events, vec![AppEvent::Started(30.0)]);
}

#[test]
fn temperature_update_drives_actuator() {
    let (mut app, mut hw, mut sink) = make_app();

    let update = SettingsUpdate::temperature(210.0);
    app.handle_command(AppCommand::UpdateSettings(update), &mut hw, &mut sink);

    let expected = expected_duty(ControlConfig::default(), 210.0);
    assert!((expected - 42.58).abs() < 0.01, "reference duty was {expected}");
    assert_eq!(app.duty_cycle(), expected);
    assert_eq!(hw.duty_cycle(), Some(expected));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::DutyCycleChanged { .. })),
        1
    );
}

#[test]
fn settings_are_applied_before_temperature() {
    let (mut app, mut hw, mut sink) = make_app();

    let update = SettingsUpdate {
        settings: PartialSettings {
            target_pv: Some(220.0),
            ..PartialSettings::default()
        },
        current_temperature: Some(210.0),
        temperature_update: true,
    };
    app.handle_command(AppCommand::UpdateSettings(update), &mut hw, &mut sink);

    let expected = expected_duty(ControlConfig::new(220.0, 200.0, 235.0), 210.0);
    assert_eq!(app.duty_cycle(), expected);
    assert_ne!(app.duty_cycle(), expected_duty(ControlConfig::default(), 210.0));

    let applied = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::SettingsApplied(_)))
        .unwrap();
    let changed = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::DutyCycleChanged { .. }))
        .unwrap();
    assert!(applied < changed);
}

#[test]
fn rejected_settings_still_deliver_temperature() {
    let (mut app, mut hw, mut sink) = make_app();

    let update = SettingsUpdate {
        settings: PartialSettings {
            clip_factor: Some(1.5),
            ..PartialSettings::default()
        },
        current_temperature: Some(210.0),
        temperature_update: true,
    };
    app.handle_command(AppCommand::UpdateSettings(update), &mut hw, &mut sink);

    assert!(sink.events.contains(&AppEvent::SettingsRejected(
        ConfigError::ClipFactorOutOfRange {
            side: Side::Low,
            value: 1.5
        }
    )));
    assert_eq!(app.law().config(), &ControlConfig::default());
    assert_eq!(app.duty_cycle(), expected_duty(ControlConfig::default(), 210.0));
}

#[test]
fn duty_override_reaches_actuator() {
    let (mut app, mut hw, mut sink) = make_app();

    let update = SettingsUpdate::settings(PartialSettings::duty_cycle(55.0));
    app.handle_command(AppCommand::UpdateSettings(update), &mut hw, &mut sink);

    assert_eq!(app.duty_cycle(), 55.0);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::SetDutyCycle(55.0)));
}

#[test]
fn power_level_is_published_without_touching_duty() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(AppCommand::SetPowerLevel(42.2), &mut hw, &mut sink);

    assert_eq!(app.power_override(), Some(42.2));
    assert_eq!(app.duty_cycle(), 30.0);
    assert_eq!(hw.last_call(), Some(&ActuatorCall::SetPowerOverride(42.2)));
    assert!(sink.events.contains(&AppEvent::PowerOverride(42.2)));
}

#[test]
fn shutdown_switches_everything_off() {
    let (mut app, mut hw, mut sink) = make_app();

    app.handle_command(AppCommand::Shutdown, &mut hw, &mut sink);
    app.handle_command(
        AppCommand::UpdateSettings(SettingsUpdate::temperature(190.0)),
        &mut hw,
        &mut sink,
    );
    app.handle_command(AppCommand::SetPowerLevel(80.0), &mut hw, &mut sink);

    assert!(app.is_shutdown_requested());
    // The law still tracks measurements, but nothing is written after off.
    assert_eq!(app.duty_cycle(), 100.0);
    assert_eq!(app.power_override(), None);
    assert_eq!(
        hw.calls,
        vec![ActuatorCall::SetDutyCycle(30.0), ActuatorCall::AllOff]
    );
    assert_eq!(hw.duty_cycle(), None);
    assert!(!sink.events.contains(&AppEvent::PowerOverride(80.0)));
}
