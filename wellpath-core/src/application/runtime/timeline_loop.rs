use crate::application::runtime::{CommandQueue, QueueError};
use crate::application::{TimelineCommand, TimelineEvent, TimelineEventLoop};

/// Timeline event loop - processes commands in batches
#[derive(Debug)]
pub struct TimelineLoop {
    /// Stateful event loop (owns the progress list)
    event_loop: TimelineEventLoop,

    /// Inbound command queue
    inbound: CommandQueue,

    /// Outbound event queue (caller drains this)
    outbound: Vec<TimelineEvent>,

    /// Max commands to process per poll
    batch_size: usize,
}

impl TimelineLoop {
    pub fn new(event_loop: TimelineEventLoop, batch_size: usize, max_queue_size: usize) -> Self {
        Self {
            event_loop,
            inbound: CommandQueue::new(max_queue_size),
            outbound: Vec::new(),
            batch_size,
        }
    }

    /// Submit a command (non-blocking)
    ///
    /// A refresh submitted right behind a queued refresh is merged into it.
    pub fn submit(&mut self, cmd: TimelineCommand) -> Result<(), QueueError> {
        self.inbound.push(cmd).map(|_| ())
    }

    /// Process up to `batch_size` commands
    /// Returns number of commands processed
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;

        while processed < self.batch_size {
            match self.inbound.pop() {
                Some(cmd) => {
                    let event = self.event_loop.handle_command(cmd);
                    self.outbound.push(event);
                    processed += 1;
                }
                None => break,
            }
        }

        processed
    }

    /// Drain all emitted events (caller's responsibility)
    pub fn drain_events(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.outbound)
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Get reference to event loop (for queries)
    pub fn event_loop(&self) -> &TimelineEventLoop {
        &self.event_loop
    }
}
