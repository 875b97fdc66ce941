//! Fuzz target: `ControlLaw` settings and measurements
//!
//! Interprets the input as a stream of f64 values: settings updates and
//! measurements interleaved.  The duty cycle must stay within [0, 100]
//! whatever is accepted or rejected along the way.
//!
//! cargo fuzz run fuzz_control_law

#![no_main]

use libfuzzer_sys::fuzz_target;
use yapctl::control::settings::PartialSettings;
use yapctl::control::yap::{ControlConfig, ControlLaw};

fuzz_target!(|data: &[u8]| {
    let Ok(mut law) = ControlLaw::new(ControlConfig::default(), 30.0) else {
        return;
    };

    for chunk in data.chunks_exact(9) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&chunk[1..]);
        let value = f64::from_le_bytes(raw);

        let update = match chunk[0] % 8 {
            0 => PartialSettings {
                target_pv: Some(value),
                ..PartialSettings::default()
            },
            1 => PartialSettings {
                control_range_low: Some(value),
                ..PartialSettings::default()
            },
            2 => PartialSettings {
                control_range_high: Some(value),
                ..PartialSettings::default()
            },
            3 => PartialSettings {
                clip_factor: Some(value),
                ..PartialSettings::default()
            },
            4 => PartialSettings::duty_cycle(value),
            _ => {
                law.update_process_value(value);
                assert!((0.0..=100.0).contains(&law.duty_cycle()));
                continue;
            }
        };
        let before = (*law.config(), law.duty_cycle());
        if law.apply_settings(&update).is_err() {
            assert_eq!((*law.config(), law.duty_cycle()), before);
        }
        assert!((0.0..=100.0).contains(&law.duty_cycle()));
    }
});
