use crate::api::{ApiError, Page};
use crate::application::UpdateRequest;
use crate::domain::{
    ChallengeProgress, ChallengeType, ProcessStatus, ProgressId, StepId, StepKey, StepStatus,
};
use chrono::NaiveDate;

/// Commands that can be executed on the progress timeline
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineCommand {
    /// Fetch the current page with the current filters
    Load,

    /// Re-issue the last fetch
    Retry,

    /// Fetch another page (1-based)
    GoToPage(u32),

    /// A fetch finished (success or failure)
    FetchCompleted {
        seq: u64,
        result: Result<Page<ChallengeProgress>, ApiError>,
    },

    SetProcessStatusFilter(Option<ProcessStatus>),

    SetChallengeTypeFilter(Option<ChallengeType>),

    SelectDate(Option<NaiveDate>),

    /// Switch projection (`true` = by challenge, `false` = by date)
    SetShowByChallenge(bool),

    ToggleProjection,

    /// Reset status, type and date filters together
    ClearFilters,

    ToggleChallenge(ProgressId),

    /// Toggle a day row (opaque key)
    ToggleDay(String),

    ToggleTask(StepKey),

    /// The UI scrolled the deep-linked challenge into view
    ScrollHandled,

    /// Move a step to the next status in the cycle
    AdvanceStep {
        progress_id: ProgressId,
        step_id: StepId,
        day_number: u32,
        start_date: NaiveDate,
    },

    /// Set a step to an explicit status
    SetStepStatus {
        progress_id: ProgressId,
        step_id: StepId,
        status: StepStatus,
        post_mood_id: Option<String>,
    },

    /// A status update finished (success or failure)
    UpdateCompleted {
        request: UpdateRequest,
        result: Result<(), ApiError>,
    },
}

impl TimelineCommand {
    /// Variant name, used in logs and failure events
    pub fn name(&self) -> &'static str {
        match self {
            TimelineCommand::Load => "Load",
            TimelineCommand::Retry => "Retry",
            TimelineCommand::GoToPage(_) => "GoToPage",
            TimelineCommand::FetchCompleted { .. } => "FetchCompleted",
            TimelineCommand::SetProcessStatusFilter(_) => "SetProcessStatusFilter",
            TimelineCommand::SetChallengeTypeFilter(_) => "SetChallengeTypeFilter",
            TimelineCommand::SelectDate(_) => "SelectDate",
            TimelineCommand::SetShowByChallenge(_) => "SetShowByChallenge",
            TimelineCommand::ToggleProjection => "ToggleProjection",
            TimelineCommand::ClearFilters => "ClearFilters",
            TimelineCommand::ToggleChallenge(_) => "ToggleChallenge",
            TimelineCommand::ToggleDay(_) => "ToggleDay",
            TimelineCommand::ToggleTask(_) => "ToggleTask",
            TimelineCommand::ScrollHandled => "ScrollHandled",
            TimelineCommand::AdvanceStep { .. } => "AdvanceStep",
            TimelineCommand::SetStepStatus { .. } => "SetStepStatus",
            TimelineCommand::UpdateCompleted { .. } => "UpdateCompleted",
        }
    }
}
