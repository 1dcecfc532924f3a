//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use charpipe_driver::{CommandQueue, ReadinessGates};

/// Frames queued through the public API, consumed by the dispatcher
pub static COMMANDS: CommandQueue = CommandQueue::new();

/// Drain-gated readiness handshake between init sequencer and dispatcher
pub static READINESS: ReadinessGates = ReadinessGates::new();

/// Signal that the init sequence has completed and the panel accepts text
pub static DISPLAY_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
