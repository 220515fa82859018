pub mod challenge;
pub mod progress;
pub mod status;
pub mod timeline;

pub use challenge::{Challenge, ChallengeId, ChallengeType, ImprovementTag};
pub use progress::{
    date_key, parse_calendar_date, step_date, Activity, ChallengeProgress, ProgressError,
    ProgressId, Step, StepId, StepKey,
};
pub use status::{ParseEnumError, ProcessStatus, StepStatus};
pub use timeline::{
    group_by_challenge, group_by_date, step_dates, today, ChallengeDay, DateGroup, DatedStep,
};
