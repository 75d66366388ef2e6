//! Sensor Node Firmware: Main Entry Point
//!
//! One cooperative loop, no RTOS tasks of its own.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  EspGpio · EspAdc    SystemClock    LogEventSink    Watchdog   │
//! │  (Gpio, Adc)         (Clock)        (EventSink)     (TWDT)     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  Scheduler: config · telemetry · blink · negotiate     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Transport + ConnParamsNegotiator (wireless stack side)        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use sensor_node::adapters::hardware::{EspAdc, EspGpio};
use sensor_node::adapters::log_sink::LogEventSink;
use sensor_node::adapters::time::SystemClock;
use sensor_node::config::{NodeConfig, SensorConfig};
use sensor_node::drivers::hw_init;
use sensor_node::drivers::watchdog::Watchdog;
use sensor_node::link::config_rx::FramedConfigHandler;
use sensor_node::link::negotiation::{ConnParamsNegotiator, NegotiationParams};
use sensor_node::link::transport::NullTransport;
use sensor_node::pins;
use sensor_node::scheduler::{Peripherals, Scheduler};

/// Yield to the idle task between ticks.
const LOOP_YIELD_MS: u32 = 1;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Sensor Node v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (defaults; nothing is persisted) ─────
    let config = NodeConfig::default();
    info!(
        "Config: {}",
        serde_json::to_string(&config).unwrap_or_else(|_| "<unprintable>".into())
    );

    // Supervise from here on, so a stall during bring-up still resets.
    let mut watchdog = Watchdog::new();
    watchdog.set_timeout_ms(config.watchdog_timeout_ms);
    watchdog.enable();

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without the ADC there is nothing to report.
        log::error!("HAL init failed: {}, restarting", e);
        esp_idf_hal::reset::restart();
    }

    let clock = SystemClock::new();

    // ── 4. Link ───────────────────────────────────────────────
    // No wireless stack is wired up yet; the null transport never reports
    // a peer, so the node blinks, holds the status LED off and feeds the
    // watchdog.
    let mut link = NullTransport;
    let mut negotiator =
        ConnParamsNegotiator::new(clock, NullTransport, NegotiationParams::default());

    // ── 5. Scheduler ──────────────────────────────────────────
    let mut scheduler = Scheduler::new(
        config,
        SensorConfig::default(),
        Peripherals {
            clock,
            gpio: EspGpio,
            adc: EspAdc::new(),
            watchdog,
            indicator_pins: pins::INDICATOR_GPIOS,
        },
        FramedConfigHandler::new(&pins::INDICATOR_GPIOS),
    )?;

    let mut sink = LogEventSink::new();
    scheduler.start(&mut sink);

    info!("System ready. Entering main loop.");

    // ── 6. Main loop ──────────────────────────────────────────
    loop {
        scheduler.tick(&mut link, &mut negotiator, &mut sink);
        esp_idf_hal::delay::FreeRtos::delay_ms(LOOP_YIELD_MS);
    }
}
