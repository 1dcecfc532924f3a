//! Command builders for the public display API
//!
//! Every public operation maps to exactly the frames enqueued on its
//! behalf. Cursor coordinates clamp to the panel edge rather than fail:
//! the display is a status surface, and a pinned cursor beats a refused
//! write.

use crate::config::BusMode;
use crate::frame::Frame;
use crate::instruction;

/// Character columns per row
pub const COLUMNS: u8 = 16;
/// Display rows
pub const ROWS: u8 = 2;
/// DDRAM address distance between row starts
const ROW_STRIDE: u8 = 0x40;

/// Clear the display and reset the address counter.
pub const fn clear() -> Frame {
    Frame::instruction(instruction::CLEAR)
}

/// Return cursor and display shift to origin.
pub const fn home() -> Frame {
    Frame::instruction(instruction::RETURN_HOME)
}

/// Cursor direction and display shift behavior after each write.
pub const fn entry_mode(auto_increment: bool, shift_display: bool) -> Frame {
    let mut opcode = instruction::ENTRY_MODE;
    if auto_increment {
        opcode |= instruction::ENTRY_INCREMENT;
    }
    if shift_display {
        opcode |= instruction::ENTRY_SHIFT_DISPLAY;
    }
    Frame::instruction(opcode)
}

/// Display, cursor and blink visibility.
pub const fn display_control(display_on: bool, cursor_visible: bool, cursor_blink: bool) -> Frame {
    let mut opcode = instruction::DISPLAY_CONTROL;
    if display_on {
        opcode |= instruction::DISPLAY_ON;
    }
    if cursor_visible {
        opcode |= instruction::CURSOR_ON;
    }
    if cursor_blink {
        opcode |= instruction::BLINK_ON;
    }
    Frame::instruction(opcode)
}

/// Move the cursor. Out-of-range coordinates clamp to the panel edge.
pub const fn set_cursor(row: u8, column: u8) -> Frame {
    let row = if row >= ROWS { ROWS - 1 } else { row };
    let column = if column >= COLUMNS { COLUMNS - 1 } else { column };
    Frame::instruction(instruction::SET_DDRAM_ADDR | (column + row * ROW_STRIDE))
}

/// Function set for steady operation: interface width per mode, two
/// lines, 5x8 font.
pub const fn function_set(mode: BusMode) -> Frame {
    let mut opcode = instruction::FUNCTION_SET | instruction::TWO_LINES;
    if mode.full_byte_interface() {
        opcode |= instruction::BUS_8_BIT;
    }
    Frame::instruction(opcode)
}

/// Data frames for each byte of `text`, in order.
pub fn text(text: &str) -> impl Iterator<Item = Frame> + '_ {
    text.bytes().map(Frame::data)
}
