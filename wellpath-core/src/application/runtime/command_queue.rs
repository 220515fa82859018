use crate::application::TimelineCommand;
use std::collections::VecDeque;

/// Whether a command only asks for the progress list to be fetched again
fn is_refresh(cmd: &TimelineCommand) -> bool {
    matches!(cmd, TimelineCommand::Load | TimelineCommand::Retry)
}

/// Whether a command reports the result of a remote request
fn is_completion(cmd: &TimelineCommand) -> bool {
    matches!(
        cmd,
        TimelineCommand::FetchCompleted { .. } | TimelineCommand::UpdateCompleted { .. }
    )
}

/// Bounded FIFO of timeline commands
///
/// Completions are always accepted, even past `max_size`: dropping one
/// would leave a fetch or a step update in flight forever. A refresh queued
/// directly behind another refresh is merged into it.
#[derive(Debug)]
pub struct CommandQueue {
    queue: VecDeque<TimelineCommand>,
    max_size: usize,
}

impl CommandQueue {
    pub fn new(max_size: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Queue a command
    ///
    /// Returns `Ok(false)` when it was merged into the refresh already at the
    /// back of the queue.
    pub fn push(&mut self, cmd: TimelineCommand) -> Result<bool, QueueError> {
        if is_refresh(&cmd) && self.queue.back().is_some_and(is_refresh) {
            tracing::debug!(command = cmd.name(), "merged into queued refresh");
            return Ok(false);
        }
        if self.queue.len() >= self.max_size && !is_completion(&cmd) {
            return Err(QueueError::Full {
                max: self.max_size,
                command: cmd.name(),
            });
        }
        self.queue.push_back(cmd);
        Ok(true)
    }

    pub fn pop(&mut self) -> Option<TimelineCommand> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueueError {
    #[error("Queue is full (max size: {max}), rejected {command}")]
    Full { max: usize, command: &'static str },
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Page;
    use crate::application::UpdateRequest;
    use crate::domain::{StepKey, StepStatus};

    fn completion() -> TimelineCommand {
        TimelineCommand::UpdateCompleted {
            request: UpdateRequest {
                key: StepKey::new("p-1", "s-1"),
                status: StepStatus::Completed,
                post_mood_id: None,
            },
            result: Ok(()),
        }
    }

    #[test]
    fn test_push_pop() {
        let mut queue = CommandQueue::new(10);

        assert_eq!(queue.push(TimelineCommand::ToggleProjection), Ok(true));
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.pop(), Some(TimelineCommand::ToggleProjection));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_full() {
        let mut queue = CommandQueue::new(2);

        queue.push(TimelineCommand::Load).unwrap();
        queue.push(TimelineCommand::ToggleProjection).unwrap();

        let result = queue.push(TimelineCommand::ClearFilters);
        assert_eq!(
            result,
            Err(QueueError::Full {
                max: 2,
                command: "ClearFilters"
            })
        );
    }

    #[test]
    fn test_completions_bypass_capacity() {
        let mut queue = CommandQueue::new(1);
        queue.push(TimelineCommand::ToggleProjection).unwrap();

        assert_eq!(queue.push(completion()), Ok(true));
        assert_eq!(
            queue.push(TimelineCommand::FetchCompleted {
                seq: 7,
                result: Ok(Page::from_items(vec![])),
            }),
            Ok(true)
        );
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_back_to_back_refreshes_merge() {
        let mut queue = CommandQueue::new(10);

        assert_eq!(queue.push(TimelineCommand::Load), Ok(true));
        assert_eq!(queue.push(TimelineCommand::Retry), Ok(false));
        assert_eq!(queue.push(TimelineCommand::Load), Ok(false));
        assert_eq!(queue.len(), 1);

        // Separated by another command, a refresh is queued again
        queue.push(TimelineCommand::ClearFilters).unwrap();
        assert_eq!(queue.push(TimelineCommand::Load), Ok(true));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = CommandQueue::new(10);

        for i in 1..=5 {
            queue.push(TimelineCommand::GoToPage(i)).unwrap();
        }

        for i in 1..=5 {
            assert_eq!(queue.pop(), Some(TimelineCommand::GoToPage(i)));
        }
    }

    #[test]
    fn test_default() {
        let queue = CommandQueue::default();
        assert_eq!(queue.capacity(), 100);
        assert!(queue.is_empty());
    }
}
