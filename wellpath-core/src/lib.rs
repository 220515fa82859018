//! Challenge progress timeline: domain model, backend boundary and the
//! command-driven state machine the UI renders from.

pub mod api;
pub mod application;
pub mod config;
pub mod domain;

pub use api::{ApiError, InMemoryProgressApi, ProgressApi};
pub use application::{
    Notice, NoticeKind, NoticeLevel, TimelineCommand, TimelineEvent, TimelineEventLoop,
    TimelineService, TimelineSnapshot,
};
pub use config::ApiConfig;
pub use domain::{
    ChallengeProgress, ChallengeType, ImprovementTag, ProcessStatus, Step, StepKey, StepStatus,
};
