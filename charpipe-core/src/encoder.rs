//! Per-mode line planning
//!
//! The encoder is the pure half of transmission: it decides which bytes
//! appear on the data lines for one frame, in order. The dispatcher owns
//! the armed flag and the port owns the electrical strobe; the encoder
//! never touches either.

use heapless::Vec;

use crate::config::BusMode;
use crate::frame::Frame;

/// Most line bytes one frame can need (the Parallel4 nibble pair)
pub const MAX_TRANSFERS: usize = 2;

/// Plans the data-line bytes for each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusEncoder {
    mode: BusMode,
}

impl BusEncoder {
    pub const fn new(mode: BusMode) -> Self {
        Self { mode }
    }

    pub const fn mode(&self) -> BusMode {
        self.mode
    }

    /// Line bytes for `frame`, one per bus transaction.
    ///
    /// In Parallel4 the upper nibble always goes out on D4..D7. The lower
    /// nibble is held back until the handshake arms it: before the 4-bit
    /// select the controller still latches a whole instruction from a
    /// single transfer, and a stray second write would desynchronize it.
    pub fn plan(&self, frame: Frame, lower_nibble_armed: bool) -> Vec<u8, MAX_TRANSFERS> {
        let mut lines = Vec::new();
        match self.mode {
            BusMode::Parallel8 | BusMode::Serial => {
                let _ = lines.push(frame.payload);
            }
            BusMode::Parallel4 => {
                let _ = lines.push(frame.payload & 0xF0);
                if lower_nibble_armed {
                    let _ = lines.push(frame.payload << 4);
                }
            }
        }
        lines
    }
}
