//! Recording test doubles shared by the pipeline tests

use core::cell::RefCell;

use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use charpipe_core::frame::Register;

use crate::port::{BusFault, BusPort};

/// Bus transactions recorded by [`RecordingPort`].
pub type TransferLog = RefCell<Vec<(Register, u8), 64>>;

/// Requested delays in nanoseconds, recorded instead of slept.
pub type DelayLog = RefCell<Vec<u32, 64>>;

/// Port that logs every transfer and optionally injects a fault.
pub struct RecordingPort<'a> {
    log: &'a TransferLog,
    fail_after: Option<usize>,
}

impl<'a> RecordingPort<'a> {
    pub fn new(log: &'a TransferLog) -> Self {
        Self {
            log,
            fail_after: None,
        }
    }

    /// Fail once `n` transfers have been recorded.
    pub fn fail_after(log: &'a TransferLog, n: usize) -> Self {
        Self {
            log,
            fail_after: Some(n),
        }
    }
}

impl BusPort for RecordingPort<'_> {
    async fn transfer(&mut self, register: Register, lines: u8) -> Result<(), BusFault> {
        if self.fail_after.is_some_and(|n| self.log.borrow().len() >= n) {
            return Err(BusFault::Pin);
        }
        self.log.borrow_mut().push((register, lines)).unwrap();
        Ok(())
    }
}

/// Delay that records instead of sleeping, so pipeline tests run
/// instantly and can assert exact timing requests.
pub struct RecordingDelay<'a> {
    log: &'a DelayLog,
}

impl<'a> RecordingDelay<'a> {
    pub fn new(log: &'a DelayLog) -> Self {
        Self { log }
    }
}

impl DelayNs for RecordingDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(ns).unwrap();
    }

    async fn delay_us(&mut self, us: u32) {
        self.delay_ns(us * 1_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms * 1_000_000).await;
    }
}
