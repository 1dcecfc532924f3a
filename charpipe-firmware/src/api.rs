//! Public command API surface
//!
//! Any task that wants the screen goes through [`display()`]. The handle is
//! plain data over the static queue, so grabbing one is free and there is no
//! registration step.

use charpipe_driver::DisplayHandle;

use crate::channels::COMMANDS;

/// Producer handle over the firmware's command queue.
pub fn display() -> DisplayHandle<'static> {
    DisplayHandle::new(&COMMANDS)
}
