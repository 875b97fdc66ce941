//! Gateway tests: scripted datagrams in, decoded commands out.

use std::net::UdpSocket;
use std::thread::sleep;
use std::time::Duration;

use crate::mock_hw::ScriptedTransport;

use yapctl::app::commands::AppCommand;
use yapctl::rpc::gateway::{CommandGateway, GatewayStats};
use yapctl::rpc::transport::{Transport, UdpTransport};

#[test]
fn malformed_datagrams_are_dropped_between_good_ones() {
    let transport = ScriptedTransport::new([
        r#"{"jsonrpc": "2.0", "method": "set_process_value", "params": {"power_level": "42.2"}}"#,
        "{ not json",
        r#"{"jsonrpc": "2.0", "method": "set_process_value", "params": {}}"#,
        "GET /?power_level=7.25 HTTP/1.1",
    ]);
    let mut gw = CommandGateway::new(transport, 2000);

    assert_eq!(gw.poll(), Some(AppCommand::SetPowerLevel(42.2)));
    assert_eq!(gw.poll(), None);
    assert_eq!(gw.poll(), None);
    assert_eq!(gw.poll(), Some(AppCommand::SetPowerLevel(7.3)));
    assert_eq!(gw.poll(), None);

    assert_eq!(
        gw.stats(),
        GatewayStats {
            received: 4,
            decoded: 2,
            dropped: 2
        }
    );
}

#[test]
fn oversized_datagram_is_truncated_and_dropped() {
    let body = format!(
        r#"{{"jsonrpc": "2.0", "method": "update_settings", "params": {{"target_pv": {}}}}}"#,
        "1".repeat(64)
    );
    let mut gw = CommandGateway::new(ScriptedTransport::new([body]), 32);
    assert_eq!(gw.poll(), None);
    assert_eq!(gw.stats().dropped, 1);
}

#[test]
fn shutdown_closes_transport() {
    let transport =
        ScriptedTransport::new([r#"{"jsonrpc": "2.0", "method": "shutdown", "params": {}}"#]);
    let mut gw = CommandGateway::new(transport, 2000);
    gw.shutdown();
    assert!(!gw.transport().is_open());
    assert_eq!(gw.poll(), None);
    assert_eq!(gw.transport().pending(), 1);
}

#[test]
fn udp_round_trip_on_loopback() {
    let transport = UdpTransport::bind("127.0.0.1", 0).unwrap();
    let addr = transport.local_addr().unwrap();
    let mut gw = CommandGateway::new(transport, 2000);

    let client = UdpSocket::bind("127.0.0.1:0").unwrap();
    client
        .send_to(
            br#"{"jsonrpc": "2.0", "method": "shutdown", "params": {}, "id": 9}"#,
            addr,
        )
        .unwrap();

    let mut cmd = None;
    for _ in 0..200 {
        cmd = gw.poll();
        if cmd.is_some() {
            break;
        }
        sleep(Duration::from_millis(5));
    }
    assert_eq!(cmd, Some(AppCommand::Shutdown));

    gw.shutdown();
    assert!(gw.transport().local_addr().is_none());
}
