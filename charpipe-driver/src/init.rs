//! Power-on initialization sequencer
//!
//! The HD44780 wakes in 8-bit mode with its busy flag unreadable, so the
//! sequencer walks it to a known state through the same queue every other
//! producer uses: three timed function-set writes, then the staged
//! handshake that arms the dispatcher's pacing and, on Parallel4, the
//! lower-nibble encoding. Each stage commits only at a queue-drain
//! boundary, never at a wall-clock instant.

use embedded_hal_async::delay::DelayNs;

use charpipe_core::command;
use charpipe_core::config::BusMode;
use charpipe_core::frame::Frame;
use charpipe_core::instruction;

use crate::queue::CommandQueue;
use crate::readiness::ReadinessGates;

/// Settle after power before the first wake write, milliseconds.
pub const POWER_ON_SETTLE_MS: u32 = 100;
/// Settle between the first and second wake writes, milliseconds.
pub const WAKE_REPEAT_SETTLE_MS: u32 = 10;
/// Settle before the final wake write, microseconds.
pub const WAKE_FINAL_SETTLE_US: u32 = 200;

/// Runs once at boot, then terminates.
pub struct InitSequencer<'ch, D> {
    queue: &'ch CommandQueue,
    gates: &'ch ReadinessGates,
    mode: BusMode,
    delay: D,
}

impl<'ch, D> InitSequencer<'ch, D>
where
    D: DelayNs,
{
    pub fn new(
        queue: &'ch CommandQueue,
        gates: &'ch ReadinessGates,
        mode: BusMode,
        delay: D,
    ) -> Self {
        Self {
            queue,
            gates,
            mode,
            delay,
        }
    }

    /// Walk the controller from power-on to a cleared, configured panel.
    pub async fn run(mut self) {
        // Wake writes: function set, 8-bit, three times with datasheet
        // timing. The dispatcher transmits these unpaced and, on the
        // nibble bus, as single upper-nibble writes.
        let wake = Frame::instruction(instruction::FUNCTION_SET | instruction::BUS_8_BIT);
        self.delay.delay_ms(POWER_ON_SETTLE_MS).await;
        self.queue.send(wake).await;
        self.delay.delay_ms(WAKE_REPEAT_SETTLE_MS).await;
        self.queue.send(wake).await;
        self.delay.delay_us(WAKE_FINAL_SETTLE_US).await;
        self.queue.send(wake).await;

        // From here every instruction needs the execution-settle delay
        self.gates.busy_flag.request();
        self.gates.busy_flag.confirmed().await;

        if self.mode == BusMode::Parallel4 {
            // Bare function set: a single upper-nibble write that flips
            // the controller to 4-bit addressing
            self.queue
                .send(Frame::instruction(instruction::FUNCTION_SET))
                .await;
            self.gates.lower_nibble.request();
            self.gates.lower_nibble.confirmed().await;
        }

        // Steady configuration through the normal builders
        self.queue.send(command::function_set(self.mode)).await;
        self.queue
            .send(command::display_control(false, false, false))
            .await;
        self.queue.send(command::clear()).await;
        self.queue.send(command::entry_mode(true, false)).await;
        self.queue
            .send(command::display_control(true, false, false))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use heapless::Vec;

    use charpipe_core::frame::Register;

    use crate::dispatcher::Dispatcher;
    use crate::mock::{DelayLog, RecordingDelay, RecordingPort, TransferLog};

    const I: Register = Register::Instruction;

    /// Run the boot sequence against a recording port, driving the
    /// dispatcher until `expected_transfers` line bytes have gone out.
    fn run_boot(mode: BusMode, expected_transfers: usize) -> (TransferLog, DelayLog, DelayLog) {
        let queue = CommandQueue::new();
        let gates = ReadinessGates::new();
        let transfers: TransferLog = RefCell::new(Vec::new());
        let init_delays: DelayLog = RefCell::new(Vec::new());
        let settle_delays: DelayLog = RefCell::new(Vec::new());

        let init = InitSequencer::new(&queue, &gates, mode, RecordingDelay::new(&init_delays));
        let mut dispatcher = Dispatcher::new(
            &queue,
            &gates,
            RecordingPort::new(&transfers),
            mode,
            RecordingDelay::new(&settle_delays),
        );

        block_on(join(init.run(), async {
            while transfers.borrow().len() < expected_transfers {
                dispatcher.service_next().await.unwrap();
            }
        }));

        (transfers, init_delays, settle_delays)
    }

    #[test]
    fn test_parallel4_boot_line_sequence() {
        let (transfers, init_delays, settle_delays) = run_boot(BusMode::Parallel4, 14);

        assert_eq!(
            transfers.borrow().as_slice(),
            &[
                // Three wake writes, upper nibble only
                (I, 0x30),
                (I, 0x30),
                (I, 0x30),
                // 4-bit select, still a single write
                (I, 0x20),
                // Function set 0x28 and the rest as nibble pairs
                (I, 0x20),
                (I, 0x80),
                // Display off 0x08
                (I, 0x00),
                (I, 0x80),
                // Clear 0x01
                (I, 0x00),
                (I, 0x10),
                // Entry mode 0x06
                (I, 0x00),
                (I, 0x60),
                // Display on 0x0C
                (I, 0x00),
                (I, 0xC0),
            ]
        );

        // Host-side waking delays, in order
        assert_eq!(
            init_delays.borrow().as_slice(),
            &[100_000_000, 10_000_000, 200_000]
        );

        // Settle skipped for exactly the three wake writes, then one
        // fixed delay per frame (not per nibble)
        assert_eq!(settle_delays.borrow().as_slice(), &[2_000_000; 6]);
    }

    #[test]
    fn test_parallel8_boot_line_sequence() {
        let (transfers, init_delays, settle_delays) = run_boot(BusMode::Parallel8, 8);

        assert_eq!(
            transfers.borrow().as_slice(),
            &[
                (I, 0x30),
                (I, 0x30),
                (I, 0x30),
                (I, 0x38),
                (I, 0x08),
                (I, 0x01),
                (I, 0x06),
                (I, 0x0C),
            ]
        );
        assert_eq!(
            init_delays.borrow().as_slice(),
            &[100_000_000, 10_000_000, 200_000]
        );
        assert_eq!(settle_delays.borrow().as_slice(), &[2_000_000; 5]);
    }

    #[test]
    fn test_serial_boot_matches_full_byte_flow() {
        let (transfers, _, settle_delays) = run_boot(BusMode::Serial, 8);

        assert_eq!(
            transfers.borrow().as_slice(),
            &[
                (I, 0x30),
                (I, 0x30),
                (I, 0x30),
                (I, 0x38),
                (I, 0x08),
                (I, 0x01),
                (I, 0x06),
                (I, 0x0C),
            ]
        );
        assert_eq!(settle_delays.borrow().as_slice(), &[2_000_000; 5]);
    }

    #[test]
    fn test_boot_leaves_pipeline_in_steady_state() {
        let queue = CommandQueue::new();
        let gates = ReadinessGates::new();
        let transfers: TransferLog = RefCell::new(Vec::new());
        let init_delays: DelayLog = RefCell::new(Vec::new());
        let settle_delays: DelayLog = RefCell::new(Vec::new());

        let init = InitSequencer::new(
            &queue,
            &gates,
            BusMode::Parallel4,
            RecordingDelay::new(&init_delays),
        );
        let mut dispatcher = Dispatcher::new(
            &queue,
            &gates,
            RecordingPort::new(&transfers),
            BusMode::Parallel4,
            RecordingDelay::new(&settle_delays),
        );

        block_on(async {
            join(init.run(), async {
                while transfers.borrow().len() < 14 {
                    dispatcher.service_next().await.unwrap();
                }
            })
            .await;

            // A write after boot is paced and nibble-split like any
            // steady-state frame
            queue.send(Frame::data(b'A')).await;
            dispatcher.service_next().await.unwrap();
        });

        let all = transfers.borrow();
        assert_eq!(&all.as_slice()[14..], &[(Register::Data, 0x40), (Register::Data, 0x10)]);
        assert_eq!(settle_delays.borrow().len(), 7);
    }
}
