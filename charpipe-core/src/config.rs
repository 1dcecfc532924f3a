//! Bus attachment configuration
//!
//! The electrical mode is chosen once at boot and never changes for the
//! lifetime of the pipeline. Pin assignments are plain GPIO numbers; the
//! firmware maps them onto the board's typed pins when it constructs the
//! port.

use heapless::Vec;

/// Electrical attachment between controller and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// Eight data lines, one transfer per payload byte
    Parallel8,
    /// Four data lines (D4..D7), two nibble transfers per byte
    Parallel4,
    /// SPI to an external shift register fanning out to the display pins
    Serial,
}

impl BusMode {
    /// Whether a payload byte reaches the controller in a single transfer.
    pub const fn full_byte_interface(self) -> bool {
        !matches!(self, BusMode::Parallel4)
    }
}

/// Control line assignments shared by the parallel modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlLines {
    /// RS: instruction/data register select
    pub register_select: u8,
    /// RW: read/write select, held low (write-only pipeline)
    pub read_write: u8,
    /// E: transfer strobe
    pub enable: u8,
}

impl ControlLines {
    pub const fn new(register_select: u8, read_write: u8, enable: u8) -> Self {
        Self {
            register_select,
            read_write,
            enable,
        }
    }

    const fn pins(&self) -> [u8; 3] {
        [self.register_select, self.read_write, self.enable]
    }
}

/// Line assignments for the configured mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusLines {
    /// Full byte bus, D0..D7
    Parallel8 {
        data: [u8; 8],
        control: ControlLines,
    },
    /// Nibble bus on the controller's D4..D7 inputs
    Parallel4 {
        data: [u8; 4],
        control: ControlLines,
    },
    /// SPI link to the shift register
    Serial {
        clock: u8,
        data_out: u8,
        chip_select: u8,
        frequency_hz: u32,
    },
}

/// Complete bus configuration as loaded at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    pub lines: BusLines,
}

/// Configuration rejected at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Two roles assigned to the same GPIO
    DuplicatePin(u8),
    /// Serial clock frequency must be nonzero
    ZeroFrequency,
}

impl BusConfig {
    pub const fn new(lines: BusLines) -> Self {
        Self { lines }
    }

    /// Mode implied by the line assignments.
    pub const fn mode(&self) -> BusMode {
        match self.lines {
            BusLines::Parallel8 { .. } => BusMode::Parallel8,
            BusLines::Parallel4 { .. } => BusMode::Parallel4,
            BusLines::Serial { .. } => BusMode::Serial,
        }
    }

    /// Reject assignments that cannot drive a bus. Failures are fatal at
    /// boot; the pipeline never starts on a bad configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Capacity covers the widest mode (8 data + 3 control)
        let mut pins: Vec<u8, 11> = Vec::new();
        match &self.lines {
            BusLines::Parallel8 { data, control } => {
                let _ = pins.extend_from_slice(data);
                let _ = pins.extend_from_slice(&control.pins());
            }
            BusLines::Parallel4 { data, control } => {
                let _ = pins.extend_from_slice(data);
                let _ = pins.extend_from_slice(&control.pins());
            }
            BusLines::Serial {
                clock,
                data_out,
                chip_select,
                frequency_hz,
            } => {
                if *frequency_hz == 0 {
                    return Err(ConfigError::ZeroFrequency);
                }
                let _ = pins.extend_from_slice(&[*clock, *data_out, *chip_select]);
            }
        }
        for (i, pin) in pins.iter().enumerate() {
            if pins[..i].contains(pin) {
                return Err(ConfigError::DuplicatePin(*pin));
            }
        }
        Ok(())
    }
}
