//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod dispatcher;
pub mod init;

pub use dispatcher::{dispatcher_task, BoardPort};
pub use init::init_task;
