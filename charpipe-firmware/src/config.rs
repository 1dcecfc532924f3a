//! Simple TOML parser for the display configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! display.toml. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - Single-line integer arrays: data = [11, 12, 13, 14]
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line values
//! - Dotted keys and nested sections
//! - Underscore digit separators in integers
//!
//! build.rs validates the shipped display.toml with a real TOML parser on
//! the host, so by the time this runs on target the file is well formed.
//! The errors here still matter for hand-edited configs on the bench.

use charpipe_core::config::{BusConfig, BusLines, BusMode, ControlLines};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Key outside any section, or not one its section knows
    InvalidKey,
    /// Invalid value type
    InvalidValue,
    /// [bus] mode missing or not a recognized bus name
    MissingMode,
    /// The wiring section for the selected mode is absent or incomplete
    MissingLines,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Bus,
    Parallel8,
    Parallel4,
    Serial,
}

/// Keys collected from a [parallel8] or [parallel4] section
#[derive(Default, Clone, Copy)]
struct ParallelKeys<const WIDTH: usize> {
    data: Option<[u8; WIDTH]>,
    register_select: Option<u8>,
    read_write: Option<u8>,
    enable: Option<u8>,
}

impl<const WIDTH: usize> ParallelKeys<WIDTH> {
    fn set(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        match key {
            "data" => self.data = Some(parse_pin_array(value)?),
            "rs" => self.register_select = Some(parse_pin(value)?),
            "rw" => self.read_write = Some(parse_pin(value)?),
            "e" => self.enable = Some(parse_pin(value)?),
            _ => return Err(ParseError::InvalidKey),
        }
        Ok(())
    }

    fn control(&self) -> Result<ControlLines, ParseError> {
        Ok(ControlLines::new(
            self.register_select.ok_or(ParseError::MissingLines)?,
            self.read_write.ok_or(ParseError::MissingLines)?,
            self.enable.ok_or(ParseError::MissingLines)?,
        ))
    }
}

impl ParallelKeys<8> {
    fn into_lines(self) -> Result<BusLines, ParseError> {
        Ok(BusLines::Parallel8 {
            data: self.data.ok_or(ParseError::MissingLines)?,
            control: self.control()?,
        })
    }
}

impl ParallelKeys<4> {
    fn into_lines(self) -> Result<BusLines, ParseError> {
        Ok(BusLines::Parallel4 {
            data: self.data.ok_or(ParseError::MissingLines)?,
            control: self.control()?,
        })
    }
}

/// Keys collected from a [serial] section
#[derive(Default, Clone, Copy)]
struct SerialKeys {
    clock: Option<u8>,
    data_out: Option<u8>,
    chip_select: Option<u8>,
    frequency_hz: Option<u32>,
}

impl SerialKeys {
    fn set(&mut self, key: &str, value: &str) -> Result<(), ParseError> {
        match key {
            "clock" => self.clock = Some(parse_pin(value)?),
            "data_out" => self.data_out = Some(parse_pin(value)?),
            "chip_select" => self.chip_select = Some(parse_pin(value)?),
            "frequency_hz" => self.frequency_hz = Some(parse_integer(value)?),
            _ => return Err(ParseError::InvalidKey),
        }
        Ok(())
    }

    fn into_lines(self) -> Result<BusLines, ParseError> {
        Ok(BusLines::Serial {
            clock: self.clock.ok_or(ParseError::MissingLines)?,
            data_out: self.data_out.ok_or(ParseError::MissingLines)?,
            chip_select: self.chip_select.ok_or(ParseError::MissingLines)?,
            frequency_hz: self.frequency_hz.ok_or(ParseError::MissingLines)?,
        })
    }
}

/// Parse TOML configuration into a BusConfig
///
/// Collects every section it recognizes, then assembles the one selected by
/// [bus] mode. Sections for the other modes may stay in the file as wiring
/// notes without being complete.
pub fn parse_config(input: &str) -> Result<BusConfig, ParseError> {
    let mut section = Section::Root;
    let mut mode: Option<BusMode> = None;
    let mut parallel8 = ParallelKeys::<8>::default();
    let mut parallel4 = ParallelKeys::<4>::default();
    let mut serial = SerialKeys::default();

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        // Section header
        if line.starts_with('[') && line.ends_with(']') {
            section = match &line[1..line.len() - 1] {
                "bus" => Section::Bus,
                "parallel8" => Section::Parallel8,
                "parallel4" => Section::Parallel4,
                "serial" => Section::Serial,
                _ => return Err(ParseError::InvalidSection),
            };
            continue;
        }

        // Parse key = value
        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidKey)?;
        match section {
            Section::Root => return Err(ParseError::InvalidKey),
            Section::Bus => match key {
                "mode" => mode = Some(parse_mode(value)?),
                _ => return Err(ParseError::InvalidKey),
            },
            Section::Parallel8 => parallel8.set(key, value)?,
            Section::Parallel4 => parallel4.set(key, value)?,
            Section::Serial => serial.set(key, value)?,
        }
    }

    let lines = match mode.ok_or(ParseError::MissingMode)? {
        BusMode::Parallel8 => parallel8.into_lines()?,
        BusMode::Parallel4 => parallel4.into_lines()?,
        BusMode::Serial => serial.into_lines()?,
    };
    Ok(BusConfig::new(lines))
}

/// Strip trailing comment from a line
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Split a line into key and value at the first '='
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn parse_mode(value: &str) -> Result<BusMode, ParseError> {
    match unquote(value)? {
        "parallel8" => Ok(BusMode::Parallel8),
        "parallel4" => Ok(BusMode::Parallel4),
        "serial" => Ok(BusMode::Serial),
        _ => Err(ParseError::MissingMode),
    }
}

fn unquote(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_pin(value: &str) -> Result<u8, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_integer(value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a single-line array of exactly WIDTH pin numbers
fn parse_pin_array<const WIDTH: usize>(value: &str) -> Result<[u8; WIDTH], ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut pins = [0u8; WIDTH];
    let mut count = 0;
    for item in inner.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        if count == WIDTH {
            return Err(ParseError::InvalidValue);
        }
        pins[count] = parse_pin(item)?;
        count += 1;
    }
    if count != WIDTH {
        return Err(ParseError::InvalidValue);
    }
    Ok(pins)
}
