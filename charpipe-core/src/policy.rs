//! Dispatcher readiness policy
//!
//! All transmit-time behavior is a function of this state machine: whether
//! the fixed execution-settle delay runs before a transfer, and whether
//! Parallel4 sends the lower nibble. Stage requests are latched here and
//! committed only when the caller has observed the queue empty, so every
//! frame enqueued before a request is transmitted entirely under the
//! pre-request policy.

use crate::config::BusMode;

/// Handshake stages the init sequencer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeStage {
    /// Arm the execution-settle delay (the busy-flag substitute)
    BusyFlag,
    /// Arm lower-nibble transfers (Parallel4 only)
    LowerNibble,
}

/// Dispatcher readiness states, in boot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchState {
    /// Wake-up writes in flight; no settle delay, upper nibble only
    AwaitingBusyFlag,
    /// Parallel4 between handshakes; settle armed, upper nibble only
    AwaitingLowerNibble,
    /// Normal operation
    Steady,
}

/// Readiness state plus the latched stage request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchPolicy {
    mode: BusMode,
    state: DispatchState,
    requested: Option<HandshakeStage>,
}

impl DispatchPolicy {
    /// Policy at power-on for the given mode.
    pub const fn new(mode: BusMode) -> Self {
        Self {
            mode,
            state: DispatchState::AwaitingBusyFlag,
            requested: None,
        }
    }

    pub const fn state(&self) -> DispatchState {
        self.state
    }

    /// Whether transfers wait the execution-settle delay first.
    pub const fn settle_armed(&self) -> bool {
        !matches!(self.state, DispatchState::AwaitingBusyFlag)
    }

    /// Whether Parallel4 sends the lower nibble. Always true for the
    /// full-byte modes.
    pub const fn lower_nibble_armed(&self) -> bool {
        match self.mode {
            BusMode::Parallel4 => matches!(self.state, DispatchState::Steady),
            BusMode::Parallel8 | BusMode::Serial => true,
        }
    }

    /// Latch a stage request. It takes effect at the next drain commit,
    /// never mid-queue.
    pub fn request(&mut self, stage: HandshakeStage) {
        self.requested = Some(stage);
    }

    /// Commit the latched request, if any. Call only after observing the
    /// queue empty. Returns the stage to confirm to the requester.
    ///
    /// A request that does not match the current state (repeated or out of
    /// order) still confirms, but the state does not move; stages only
    /// ever advance.
    pub fn commit_drained(&mut self) -> Option<HandshakeStage> {
        use DispatchState::*;
        use HandshakeStage::*;

        let stage = self.requested.take()?;
        self.state = match (self.state, stage) {
            (AwaitingBusyFlag, BusyFlag) => match self.mode {
                BusMode::Parallel4 => AwaitingLowerNibble,
                BusMode::Parallel8 | BusMode::Serial => Steady,
            },
            (AwaitingLowerNibble, LowerNibble) => Steady,

            // Stale or repeated request: confirm, stay put
            (state, _) => state,
        };
        Some(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_policy() {
        for mode in [BusMode::Parallel8, BusMode::Parallel4, BusMode::Serial] {
            let policy = DispatchPolicy::new(mode);
            assert_eq!(policy.state(), DispatchState::AwaitingBusyFlag);
            assert!(!policy.settle_armed());
        }
        // Only the nibble bus starts with the lower half held back
        assert!(!DispatchPolicy::new(BusMode::Parallel4).lower_nibble_armed());
        assert!(DispatchPolicy::new(BusMode::Parallel8).lower_nibble_armed());
        assert!(DispatchPolicy::new(BusMode::Serial).lower_nibble_armed());
    }

    #[test]
    fn test_busy_flag_commit_full_byte_modes() {
        for mode in [BusMode::Parallel8, BusMode::Serial] {
            let mut policy = DispatchPolicy::new(mode);
            policy.request(HandshakeStage::BusyFlag);
            assert_eq!(policy.commit_drained(), Some(HandshakeStage::BusyFlag));
            assert_eq!(policy.state(), DispatchState::Steady);
            assert!(policy.settle_armed());
        }
    }

    #[test]
    fn test_parallel4_two_stage_boot() {
        let mut policy = DispatchPolicy::new(BusMode::Parallel4);

        // First stage arms the settle delay only
        policy.request(HandshakeStage::BusyFlag);
        assert_eq!(policy.commit_drained(), Some(HandshakeStage::BusyFlag));
        assert_eq!(policy.state(), DispatchState::AwaitingLowerNibble);
        assert!(policy.settle_armed());
        assert!(!policy.lower_nibble_armed());

        // Second stage arms the lower nibble
        policy.request(HandshakeStage::LowerNibble);
        assert_eq!(policy.commit_drained(), Some(HandshakeStage::LowerNibble));
        assert_eq!(policy.state(), DispatchState::Steady);
        assert!(policy.lower_nibble_armed());
    }

    #[test]
    fn test_request_holds_until_commit() {
        let mut policy = DispatchPolicy::new(BusMode::Parallel8);
        policy.request(HandshakeStage::BusyFlag);

        // Nothing changes until the caller reports a drained queue
        assert_eq!(policy.state(), DispatchState::AwaitingBusyFlag);
        assert!(!policy.settle_armed());

        assert_eq!(policy.commit_drained(), Some(HandshakeStage::BusyFlag));
        assert!(policy.settle_armed());
    }

    #[test]
    fn test_commit_without_request_is_noop() {
        let mut policy = DispatchPolicy::new(BusMode::Parallel4);
        assert_eq!(policy.commit_drained(), None);
        assert_eq!(policy.state(), DispatchState::AwaitingBusyFlag);

        policy.request(HandshakeStage::BusyFlag);
        policy.commit_drained();
        assert_eq!(policy.commit_drained(), None);
        assert_eq!(policy.state(), DispatchState::AwaitingLowerNibble);
    }

    #[test]
    fn test_repeated_request_confirms_without_moving() {
        let mut policy = DispatchPolicy::new(BusMode::Parallel4);
        policy.request(HandshakeStage::BusyFlag);
        policy.commit_drained();

        // A second busy-flag request must not regress the state
        policy.request(HandshakeStage::BusyFlag);
        assert_eq!(policy.commit_drained(), Some(HandshakeStage::BusyFlag));
        assert_eq!(policy.state(), DispatchState::AwaitingLowerNibble);
    }

    #[test]
    fn test_out_of_order_request_confirms_without_moving() {
        let mut policy = DispatchPolicy::new(BusMode::Parallel4);

        // Lower-nibble requested before the busy-flag stage
        policy.request(HandshakeStage::LowerNibble);
        assert_eq!(policy.commit_drained(), Some(HandshakeStage::LowerNibble));
        assert_eq!(policy.state(), DispatchState::AwaitingBusyFlag);
    }

    #[test]
    fn test_request_overwrite_keeps_latest() {
        let mut policy = DispatchPolicy::new(BusMode::Parallel4);
        policy.request(HandshakeStage::LowerNibble);
        policy.request(HandshakeStage::BusyFlag);
        assert_eq!(policy.commit_drained(), Some(HandshakeStage::BusyFlag));
        assert_eq!(policy.state(), DispatchState::AwaitingLowerNibble);
    }
}
