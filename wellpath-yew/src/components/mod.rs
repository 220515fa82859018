//! UI components for the progress timeline

mod catalog_panel;
mod challenge_timeline;
mod date_timeline;
mod filter_bar;
mod notice_toasts;
mod step_item;

pub use catalog_panel::CatalogPanel;
pub use challenge_timeline::{challenge_anchor, ChallengeTimeline};
pub use date_timeline::DateTimeline;
pub use filter_bar::FilterBar;
pub use notice_toasts::NoticeToasts;
pub use step_item::{StepItem, StepItemProps};
