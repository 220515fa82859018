mod use_timeline;

pub use use_timeline::{use_snapshot, use_timeline, TimelineContext};
