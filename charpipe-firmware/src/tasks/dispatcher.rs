//! Bus dispatcher task
//!
//! Single consumer of the command queue and sole owner of the bus port.
//! Every byte the display ever sees leaves through this task, which is
//! what makes queue order transmission order.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;

use charpipe_core::config::BusMode;
use charpipe_driver::{AnyPort, Dispatcher};

use crate::channels::{COMMANDS, READINESS};

/// The port over this board's concrete pin, SPI and delay types. One
/// alias keeps the task signature readable and non-generic.
pub type BoardPort = AnyPort<Output<'static>, Spi<'static, SPI0, spi::Async>, Delay>;

/// Dispatcher task - drains the queue onto the bus
#[embassy_executor::task]
pub async fn dispatcher_task(port: BoardPort, mode: BusMode) {
    info!("Dispatcher task started");

    let mut dispatcher = Dispatcher::new(&COMMANDS, &READINESS, port, mode, Delay);
    let fault = dispatcher.run().await;

    // An electrical fault cannot be fixed from software. Park here so the
    // failure stays visible in the logs instead of looping on a dead bus.
    error!("Bus fault, display pipeline halted: {:?}", fault);
    core::future::pending::<()>().await;
}
