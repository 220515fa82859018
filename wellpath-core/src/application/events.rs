use crate::application::{FetchRequest, UpdateFailure, UpdateRequest};
use crate::domain::{ProgressId, StepKey, StepStatus};
use chrono::NaiveDate;

/// Events emitted by the timeline after handling a command
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    /// A fetch must be performed
    FetchRequested(FetchRequest),

    /// The list was replaced
    ProgressesLoaded {
        seq: u64,
        count: usize,
        /// Deep-linked challenge that was expanded by this load
        focused: Option<ProgressId>,
    },

    /// The fetch succeeded with no progresses
    ProgressesEmpty { seq: u64 },

    /// A completion arrived for a superseded fetch
    FetchDiscarded { seq: u64, latest: u64 },

    FetchFailed { seq: u64, reason: String },

    /// Filters or projection changed; `fetch` is set when a refetch is needed
    FiltersChanged { fetch: Option<FetchRequest> },

    ExpansionChanged,

    /// A status update must be performed
    UpdateRequested(UpdateRequest),

    StepStatusChanged {
        key: StepKey,
        from: StepStatus,
        to: StepStatus,
        /// Calendar date of the step, when it could be derived
        date: Option<NaiveDate>,
    },

    StepUpdateFailed { key: StepKey, failure: UpdateFailure },

    /// The command had no effect
    Unchanged,

    /// Command failed
    CommandFailed { command: String, reason: String },
}

/// Remote work an event asks the caller to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteRequest {
    Fetch(FetchRequest),
    Update(UpdateRequest),
}

impl TimelineEvent {
    pub fn remote_request(&self) -> Option<RemoteRequest> {
        match self {
            TimelineEvent::FetchRequested(request)
            | TimelineEvent::FiltersChanged {
                fetch: Some(request),
            } => Some(RemoteRequest::Fetch(request.clone())),
            TimelineEvent::UpdateRequested(request) => Some(RemoteRequest::Update(request.clone())),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TimelineEvent::FetchFailed { .. }
                | TimelineEvent::StepUpdateFailed { .. }
                | TimelineEvent::CommandFailed { .. }
        )
    }
}
