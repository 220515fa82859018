mod command_queue;
mod timeline_loop;

pub use command_queue::{CommandQueue, QueueError};
pub use timeline_loop::TimelineLoop;
