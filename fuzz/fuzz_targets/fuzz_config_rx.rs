//! Fuzz target: `FramedConfigHandler::handle`
//!
//! Splits arbitrary input into two deliveries and checks that the receiver
//! never panics and only ever surfaces selections that pass validation and
//! leave the indicator lines alone.
//!
//! cargo fuzz run fuzz_config_rx

#![no_main]

use libfuzzer_sys::fuzz_target;
use sensor_node::app::ports::ConfigHandler;
use sensor_node::config::SensorMode;
use sensor_node::link::config_rx::FramedConfigHandler;
use sensor_node::pins;

fuzz_target!(|data: &[u8]| {
    let mut rx = FramedConfigHandler::new(&pins::INDICATOR_GPIOS);
    let split = data.first().map_or(0, |&b| usize::from(b)).min(data.len());

    for chunk in [&data[..split], &data[split..]] {
        if let Ok(Some(cfg)) = rx.handle(chunk) {
            assert!(cfg.validate().is_ok());
            if cfg.mode == SensorMode::Digital {
                assert!(!pins::INDICATOR_GPIOS.contains(&cfg.pin));
            }
        }
    }
});
