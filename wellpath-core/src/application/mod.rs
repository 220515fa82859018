mod catalog;
mod commands;
mod error;
mod event_loop;
mod events;
mod expansion;
mod filters;
mod notifications;
pub mod runtime;
mod service;
mod store;
mod view;

pub use catalog::CatalogCache;
pub use commands::TimelineCommand;
pub use error::TimelineError;
pub use event_loop::TimelineEventLoop;
pub use events::{RemoteRequest, TimelineEvent};
pub use expansion::{challenge_day_key, ExpansionState};
pub use filters::{FilterEffect, FilterState};
pub use notifications::{Notice, NoticeKind, NoticeLevel, NotificationCenter};
pub use service::TimelineService;
pub use store::{
    FetchOutcome, FetchRequest, LoadState, ProgressStore, UpdateFailure, UpdateOutcome,
    UpdateRequest,
};
pub use view::{ChallengeSection, TimelineSnapshot};
