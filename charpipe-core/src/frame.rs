//! Queue element for the display pipeline
//!
//! A [`Frame`] is one logical write destined for the display: the target
//! register plus the byte to deliver. Frames carry no bus-mode knowledge;
//! splitting a payload into nibbles is the encoder's job at transmit time.

/// Target register on the display controller (the RS line level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Command register, RS low
    Instruction,
    /// Character data register, RS high
    Data,
}

/// One logical write destined for the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    /// Register the payload is written to
    pub register: Register,
    /// Instruction opcode or character byte
    pub payload: u8,
}

impl Frame {
    /// Frame addressed to the instruction register.
    pub const fn instruction(payload: u8) -> Self {
        Self {
            register: Register::Instruction,
            payload,
        }
    }

    /// Frame addressed to the data register.
    pub const fn data(payload: u8) -> Self {
        Self {
            register: Register::Data,
            payload,
        }
    }
}
