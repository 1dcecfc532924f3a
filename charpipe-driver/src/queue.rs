//! Command queue and producer handle
//!
//! One bounded MPSC channel is the only path frames take to the bus.
//! Producers enqueue through [`DisplayHandle`]; the dispatcher task is
//! the sole consumer. Transmission order is queue order, regardless of
//! which task enqueued what.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use charpipe_core::command;
use charpipe_core::frame::Frame;

/// Queue capacity: one full 32-character screen plus head-room for the
/// control commands that usually precede it.
pub const QUEUE_DEPTH: usize = 40;

/// The pipeline's frame channel. The firmware declares one as a static.
pub type CommandQueue = Channel<CriticalSectionRawMutex, Frame, QUEUE_DEPTH>;

/// Producer handle exposing the public command API.
///
/// Copyable; any number of tasks may hold one. Every method awaits queue
/// space when the pipeline is backed up, so nothing is ever dropped.
#[derive(Clone, Copy)]
pub struct DisplayHandle<'ch> {
    queue: &'ch CommandQueue,
}

impl<'ch> DisplayHandle<'ch> {
    pub const fn new(queue: &'ch CommandQueue) -> Self {
        Self { queue }
    }

    /// Clear the display and reset the cursor to origin.
    pub async fn clear(&self) {
        self.queue.send(command::clear()).await;
    }

    /// Return cursor and display shift to origin.
    pub async fn home(&self) {
        self.queue.send(command::home()).await;
    }

    /// Cursor direction and display shift behavior after each write.
    pub async fn set_entry_mode(&self, auto_increment: bool, shift_display: bool) {
        self.queue
            .send(command::entry_mode(auto_increment, shift_display))
            .await;
    }

    /// Display, cursor and blink visibility.
    pub async fn set_display_control(
        &self,
        display_on: bool,
        cursor_visible: bool,
        cursor_blink: bool,
    ) {
        self.queue
            .send(command::display_control(
                display_on,
                cursor_visible,
                cursor_blink,
            ))
            .await;
    }

    /// Switch the panel on with cursor and blink hidden.
    pub async fn display_on(&self) {
        self.set_display_control(true, false, false).await;
    }

    /// Blank the panel without losing its contents.
    pub async fn display_off(&self) {
        self.set_display_control(false, false, false).await;
    }

    /// Move the cursor. Out-of-range coordinates clamp to the panel edge.
    pub async fn set_cursor(&self, row: u8, column: u8) {
        self.queue.send(command::set_cursor(row, column)).await;
    }

    /// Write text at the cursor, one data frame per byte.
    pub async fn write_text(&self, text: &str) {
        for frame in command::text(text) {
            self.queue.send(frame).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charpipe_core::frame::Register;
    use embassy_futures::block_on;

    #[test]
    fn test_frames_leave_in_enqueue_order() {
        let queue = CommandQueue::new();
        let lcd = DisplayHandle::new(&queue);

        block_on(async {
            lcd.clear().await;
            lcd.set_cursor(1, 0).await;
            lcd.write_text("Hi").await;
        });

        assert_eq!(block_on(queue.receive()).payload, 0x01);
        assert_eq!(block_on(queue.receive()).payload, 0xC0);
        assert_eq!(block_on(queue.receive()).payload, b'H');
        assert_eq!(block_on(queue.receive()).payload, b'i');
        assert!(queue.is_empty());
    }

    #[test]
    fn test_write_text_emits_one_data_frame_per_byte() {
        let queue = CommandQueue::new();
        let lcd = DisplayHandle::new(&queue);

        block_on(lcd.write_text("AB"));

        let first = block_on(queue.receive());
        let second = block_on(queue.receive());
        assert_eq!(first, Frame::data(b'A'));
        assert_eq!(second, Frame::data(b'B'));
        assert_eq!(first.register, Register::Data);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_display_on_off_opcodes() {
        let queue = CommandQueue::new();
        let lcd = DisplayHandle::new(&queue);

        block_on(async {
            lcd.display_on().await;
            lcd.display_off().await;
        });

        assert_eq!(block_on(queue.receive()).payload, 0x0C);
        assert_eq!(block_on(queue.receive()).payload, 0x08);
    }

    #[test]
    fn test_repeated_commands_are_not_coalesced() {
        let queue = CommandQueue::new();
        let lcd = DisplayHandle::new(&queue);

        block_on(async {
            lcd.clear().await;
            lcd.clear().await;
        });

        let first = block_on(queue.receive());
        let second = block_on(queue.receive());
        assert_eq!(first, second);
        assert_eq!(first.payload, 0x01);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_interleaved_producers_drain_in_submission_order() {
        let queue = CommandQueue::new();
        let status = DisplayHandle::new(&queue);
        let banner = status;

        block_on(async {
            status.clear().await;
            banner.set_cursor(0, 3).await;
            status.write_text("A").await;
            banner.home().await;
            status.set_cursor(1, 7).await;
        });

        assert_eq!(block_on(queue.receive()), Frame::instruction(0x01));
        assert_eq!(block_on(queue.receive()), Frame::instruction(0x83));
        assert_eq!(block_on(queue.receive()), Frame::data(0x41));
        assert_eq!(block_on(queue.receive()), Frame::instruction(0x02));
        assert_eq!(block_on(queue.receive()), Frame::instruction(0xC7));
        assert!(queue.is_empty());
    }
}
