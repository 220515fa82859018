use crate::api::QueryError;
use crate::domain::StepKey;

/// Reasons the timeline rejects a command before any request is issued
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("Progress not found: {0}")]
    ProgressNotFound(String),

    #[error("Step not found: {0}")]
    StepNotFound(StepKey),

    #[error("Step {0} already has an update in flight")]
    StepBusy(StepKey),

    #[error("Page {page} is past the last page ({last})")]
    PageOutOfRange { page: u32, last: u32 },

    #[error(transparent)]
    InvalidQuery(#[from] QueryError),
}
