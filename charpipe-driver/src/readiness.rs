//! Boot handshake gates
//!
//! Two request/confirm signal pairs connect the init sequencer to the
//! dispatcher without any shared mutable state. The sequencer requests a
//! stage and awaits the confirm; the dispatcher latches the request into
//! its policy and confirms only once the queue has drained past it.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use charpipe_core::policy::HandshakeStage;

/// One request/confirm pair.
pub struct StageGate {
    request: Signal<CriticalSectionRawMutex, ()>,
    confirm: Signal<CriticalSectionRawMutex, ()>,
}

impl StageGate {
    pub const fn new() -> Self {
        Self {
            request: Signal::new(),
            confirm: Signal::new(),
        }
    }

    /// Sequencer side: ask for the stage.
    pub fn request(&self) {
        self.request.signal(());
    }

    /// Sequencer side: wait until the dispatcher has committed the stage.
    pub async fn confirmed(&self) {
        self.confirm.wait().await;
    }

    /// Dispatcher side: report the stage committed.
    pub fn confirm(&self) {
        self.confirm.signal(());
    }
}

impl Default for StageGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Both handshake stages of the boot protocol.
pub struct ReadinessGates {
    pub busy_flag: StageGate,
    pub lower_nibble: StageGate,
}

impl ReadinessGates {
    pub const fn new() -> Self {
        Self {
            busy_flag: StageGate::new(),
            lower_nibble: StageGate::new(),
        }
    }

    /// Dispatcher side: wait for either stage to be requested. Consumes
    /// the request it returns.
    pub async fn requested(&self) -> HandshakeStage {
        match select(self.busy_flag.request.wait(), self.lower_nibble.request.wait()).await {
            Either::First(()) => HandshakeStage::BusyFlag,
            Either::Second(()) => HandshakeStage::LowerNibble,
        }
    }

    /// Dispatcher side: confirm a committed stage to its requester.
    pub fn confirm(&self, stage: HandshakeStage) {
        match stage {
            HandshakeStage::BusyFlag => self.busy_flag.confirm(),
            HandshakeStage::LowerNibble => self.lower_nibble.confirm(),
        }
    }
}

impl Default for ReadinessGates {
    fn default() -> Self {
        Self::new()
    }
}
