//! The consumer half of the pipeline
//!
//! One dispatcher owns the bus port. It drains the command queue in
//! order, pacing each transfer with the fixed execution-settle delay once
//! armed, and commits handshake stages only at queue-drain boundaries.
//! The policy therefore never changes under a frame that was enqueued
//! before the stage was requested.

use embassy_futures::select::{select, Either};
use embedded_hal_async::delay::DelayNs;

use charpipe_core::config::BusMode;
use charpipe_core::encoder::BusEncoder;
use charpipe_core::policy::DispatchPolicy;

use crate::port::{BusFault, BusPort};
use crate::queue::CommandQueue;
use crate::readiness::ReadinessGates;

/// Fixed execution-settle delay, microseconds.
///
/// Upper bound on instruction execution (Clear and Home need 1.52 ms).
/// Stands in for busy-flag polling, which a write-only bus cannot do.
pub const SETTLE_DELAY_US: u32 = 2_000;

/// Owns the port and drains the queue. One per pipeline, constructed
/// inside the firmware's dispatcher task.
pub struct Dispatcher<'ch, B, D> {
    queue: &'ch CommandQueue,
    gates: &'ch ReadinessGates,
    port: B,
    settle: D,
    encoder: BusEncoder,
    policy: DispatchPolicy,
}

impl<'ch, B, D> Dispatcher<'ch, B, D>
where
    B: BusPort,
    D: DelayNs,
{
    pub fn new(
        queue: &'ch CommandQueue,
        gates: &'ch ReadinessGates,
        port: B,
        mode: BusMode,
        settle: D,
    ) -> Self {
        Self {
            queue,
            gates,
            port,
            settle,
            encoder: BusEncoder::new(mode),
            policy: DispatchPolicy::new(mode),
        }
    }

    /// Drain frames until the port faults.
    pub async fn run(&mut self) -> BusFault {
        loop {
            if let Err(fault) = self.service_next().await {
                return fault;
            }
        }
    }

    /// Service one pipeline event: transmit the next frame, or latch a
    /// stage request if one arrives first.
    ///
    /// Requests latch at any time but commit only here, at the two spots
    /// where the queue is observed empty: on latching while parked, and
    /// after a transmit has drained the last frame.
    pub async fn service_next(&mut self) -> Result<(), BusFault> {
        let frame = match select(self.queue.receive(), self.gates.requested()).await {
            Either::First(frame) => frame,
            Either::Second(stage) => {
                self.policy.request(stage);
                self.try_commit();
                return Ok(());
            }
        };

        if self.policy.settle_armed() {
            self.settle.delay_us(SETTLE_DELAY_US).await;
        }

        let plan = self.encoder.plan(frame, self.policy.lower_nibble_armed());
        for lines in plan {
            self.port.transfer(frame.register, lines).await?;
        }

        self.try_commit();
        Ok(())
    }

    /// Commit the latched stage once the queue is observed empty,
    /// confirming to the sequencer.
    fn try_commit(&mut self) {
        if !self.queue.is_empty() {
            return;
        }
        if let Some(stage) = self.policy.commit_drained() {
            self.gates.confirm(stage);
        }
    }
}
