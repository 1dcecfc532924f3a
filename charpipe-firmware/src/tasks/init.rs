//! Display init task
//!
//! Runs the power-on sequence once and then signals that the pipeline is
//! open. The task returns afterwards; nothing stays resident.

use defmt::*;
use embassy_time::Delay;

use charpipe_core::config::BusMode;
use charpipe_driver::InitSequencer;

use crate::channels::{COMMANDS, DISPLAY_READY, READINESS};

/// Init task - walks the controller from power-on to a usable panel
#[embassy_executor::task]
pub async fn init_task(mode: BusMode) {
    info!("Init task started");

    InitSequencer::new(&COMMANDS, &READINESS, mode, Delay)
        .run()
        .await;

    DISPLAY_READY.signal(());
    info!("Display init complete, pipeline open");
}
