//! Async half of the character display pipeline
//!
//! One bounded queue carries every display command; one dispatcher task
//! owns the bus. Power-on initialization runs through the same queue and
//! switches the dispatcher's behavior only at queue-drain boundaries.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ DisplayHandle ┌──────────────┐
//! │  any task    ├──────────────►│              │
//! └──────────────┘               │ CommandQueue │      ┌────────────┐
//! ┌──────────────┐    frames     │  (40 deep)   ├─────►│ Dispatcher │
//! │ InitSequencer├──────────────►│              │      └─────┬──────┘
//! └──────┬───────┘               └──────────────┘            │
//!        │            request / confirm                ┌─────▼──────┐
//!        └────────────► ReadinessGates ◄───────────────┤  BusPort   │
//!                                                      └─────┬──────┘
//!                                                        LCD module
//! ```
//!
//! Everything here is hardware-agnostic: ports are generic over
//! `embedded-hal` traits and all waiting goes through injected delays, so
//! the whole pipeline runs under `block_on` in host tests.

#![no_std]
#![deny(unsafe_code)]

pub mod dispatcher;
pub mod init;
pub mod port;
pub mod queue;
pub mod readiness;

#[cfg(test)]
mod mock;

pub use dispatcher::{Dispatcher, SETTLE_DELAY_US};
pub use init::InitSequencer;
pub use port::{AnyPort, BusFault, BusPort, Parallel4Port, Parallel8Port, SerialPort};
pub use queue::{CommandQueue, DisplayHandle, QUEUE_DEPTH};
pub use readiness::{ReadinessGates, StageGate};
