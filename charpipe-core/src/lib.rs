//! Board-agnostic logic for the character display command pipeline
//!
//! Everything in this crate is pure and host-testable:
//!
//! - Frames (queue elements) and the HD44780 instruction set
//! - Command builders with panel-edge clamping
//! - Bus attachment configuration and validation
//! - Per-mode line encoding (byte vs. nibble planning)
//! - The dispatcher's readiness policy state machine
//!
//! The async half of the pipeline (queue, bus ports, dispatcher, init
//! sequencer) lives in `charpipe-driver`.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod encoder;
pub mod frame;
pub mod instruction;
pub mod policy;

pub use config::{BusConfig, BusLines, BusMode, ConfigError, ControlLines};
pub use encoder::BusEncoder;
pub use frame::{Frame, Register};
pub use policy::{DispatchPolicy, DispatchState, HandshakeStage};
