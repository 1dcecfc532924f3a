//! HD44780 instruction set
//!
//! Opcode bases and flag bits of the controller's instruction register.
//! The table is complete even though the public API does not reach every
//! instruction; the constants document the wire protocol.

/// Clear the display and reset the address counter
pub const CLEAR: u8 = 0x01;
/// Return cursor and display shift to origin
pub const RETURN_HOME: u8 = 0x02;
/// Entry mode set
pub const ENTRY_MODE: u8 = 0x04;
/// Display on/off control
pub const DISPLAY_CONTROL: u8 = 0x08;
/// Cursor or display shift
pub const SHIFT: u8 = 0x10;
/// Function set (interface width, line count, font)
pub const FUNCTION_SET: u8 = 0x20;
/// Set CGRAM address
pub const SET_CGRAM_ADDR: u8 = 0x40;
/// Set DDRAM address
pub const SET_DDRAM_ADDR: u8 = 0x80;

// Entry mode flags
pub const ENTRY_INCREMENT: u8 = 0x02;
pub const ENTRY_SHIFT_DISPLAY: u8 = 0x01;

// Display control flags
pub const DISPLAY_ON: u8 = 0x04;
pub const CURSOR_ON: u8 = 0x02;
pub const BLINK_ON: u8 = 0x01;

// Shift flags
pub const SHIFT_DISPLAY: u8 = 0x08;
pub const SHIFT_RIGHT: u8 = 0x04;

// Function set flags
/// 8-bit interface width (cleared selects 4-bit)
pub const BUS_8_BIT: u8 = 0x10;
/// Two display lines
pub const TWO_LINES: u8 = 0x08;
/// 5x10 dot font (cleared selects 5x8)
pub const FONT_5X10: u8 = 0x04;
