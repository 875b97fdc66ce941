//! Fuzz target: `decode_datagram`
//!
//! Drives arbitrary bytes through the datagram decoder and asserts that
//! it never panics and that every decoded power level is finite and
//! already rounded to one decimal place.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use yapctl::app::commands::AppCommand;
use yapctl::rpc::gateway::decode_datagram;

fuzz_target!(|data: &[u8]| {
    if let Ok(AppCommand::SetPowerLevel(level)) = decode_datagram(data) {
        assert!(level.is_finite(), "power level must be finite");
        assert_eq!((level * 10.0).round() / 10.0, level, "power level not rounded");
    }
});
