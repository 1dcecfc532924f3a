//! Charpipe - Character display pipeline firmware
//!
//! Main firmware binary for RP2040 boards driving an HD44780-class
//! character LCD. All writes funnel through one bounded queue into a
//! single dispatcher task that owns the bus; a one-shot init task brings
//! the panel up and opens the pipeline for traffic.
//!
//! Named after what it is: characters in one end of a pipe, strobed bus
//! transfers out the other.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use charpipe_core::config::{BusLines, BusMode};
use charpipe_driver::{AnyPort, Parallel4Port, Parallel8Port, SerialPort};

use crate::tasks::BoardPort;

/// Embedded display configuration (compiled into firmware)
/// Edit display.toml and rebuild to rewire
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

mod api;
mod channels;
mod config;
mod tasks;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Charpipe firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Parse and validate the embedded configuration. A config that cannot
    // drive a bus is fatal; the pipeline never starts half-wired.
    let bus = match config::parse_config(EMBEDDED_CONFIG) {
        Ok(bus) => bus,
        Err(e) => defmt::panic!("display.toml does not parse: {:?}", e),
    };
    if let Err(e) = bus.validate() {
        defmt::panic!("display.toml rejected: {:?}", e);
    }
    let mode = bus.mode();
    info!("Bus mode: {:?}", mode);

    // Hand the configured mode its typed pins.
    // Pin assignments are board-specific and must match display.toml.
    let port: BoardPort = match bus.lines {
        BusLines::Parallel8 { .. } => {
            // D0..D7 = GPIO2..7 + GPIO11..12, RS = GPIO8, RW = GPIO9, E = GPIO10
            let data = [
                Output::new(p.PIN_2, Level::Low),
                Output::new(p.PIN_3, Level::Low),
                Output::new(p.PIN_4, Level::Low),
                Output::new(p.PIN_5, Level::Low),
                Output::new(p.PIN_6, Level::Low),
                Output::new(p.PIN_7, Level::Low),
                Output::new(p.PIN_11, Level::Low),
                Output::new(p.PIN_12, Level::Low),
            ];
            AnyPort::Parallel8(Parallel8Port::new(
                data,
                Output::new(p.PIN_8, Level::Low),
                Output::new(p.PIN_9, Level::Low),
                Output::new(p.PIN_10, Level::Low),
                Delay,
            ))
        }
        BusLines::Parallel4 { .. } => {
            // D4..D7 = GPIO11..14, RS = GPIO8, RW = GPIO9, E = GPIO10
            let data = [
                Output::new(p.PIN_11, Level::Low),
                Output::new(p.PIN_12, Level::Low),
                Output::new(p.PIN_13, Level::Low),
                Output::new(p.PIN_14, Level::Low),
            ];
            AnyPort::Parallel4(Parallel4Port::new(
                data,
                Output::new(p.PIN_8, Level::Low),
                Output::new(p.PIN_9, Level::Low),
                Output::new(p.PIN_10, Level::Low),
                Delay,
            ))
        }
        BusLines::Serial { frequency_hz, .. } => {
            // SPI0: SCK = GPIO18, TX = GPIO19, CS = GPIO17
            let mut spi_config = embassy_rp::spi::Config::default();
            spi_config.frequency = frequency_hz;
            let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config);
            // CS idles deasserted
            let chip_select = Output::new(p.PIN_17, Level::High);
            AnyPort::Serial(SerialPort::new(spi, chip_select, Delay))
        }
    };
    info!("Bus port initialized");

    // Spawn tasks. The dispatcher must be running before init so the
    // readiness handshake has a peer.
    spawner.spawn(tasks::dispatcher_task(port, mode)).unwrap();
    spawner.spawn(tasks::init_task(mode)).unwrap();

    info!("All tasks spawned, firmware running");

    // Boot banner once the init sequence has fully drained
    channels::DISPLAY_READY.wait().await;
    let lcd = api::display();
    lcd.write_text("Charpipe").await;
    lcd.set_cursor(1, 0).await;
    match mode {
        BusMode::Parallel8 => lcd.write_text("bus: parallel8").await,
        BusMode::Parallel4 => lcd.write_text("bus: parallel4").await,
        BusMode::Serial => lcd.write_text("bus: serial").await,
    }

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
