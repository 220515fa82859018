use crate::services::HttpProgressApi;
use std::rc::Rc;
use uuid::Uuid;
use wellpath_core::domain::ChallengeId;
use wellpath_core::{Notice, TimelineCommand, TimelineService, TimelineSnapshot};
use yew::prelude::*;

/// Timeline state accessible via hook
#[derive(Clone)]
pub struct TimelineContext {
    pub snapshot: TimelineSnapshot,

    /// Notices currently shown as toasts, oldest first
    pub notices: Vec<Notice>,

    /// Send commands to the timeline service
    pub send_command: Rc<dyn Fn(TimelineCommand)>,

    pub dismiss_notice: Rc<dyn Fn(Uuid)>,

    /// Join a catalog challenge and refresh the timeline
    pub register: Rc<dyn Fn(ChallengeId)>,

    /// Direct access for catalog browsing and registration
    pub service: Rc<TimelineService<HttpProgressApi>>,
}

impl PartialEq for TimelineContext {
    fn eq(&self, other: &Self) -> bool {
        self.snapshot == other.snapshot
            && self.notices == other.notices
            && Rc::ptr_eq(&self.service, &other.service)
    }
}

/// Hook to access the timeline
///
/// # Example
///
/// ```rust,no_run
/// use wellpath_yew::use_timeline;
/// use wellpath_core::TimelineCommand;
/// # use yew::prelude::*;
///
/// # #[function_component]
/// # fn Example() -> Html {
/// let timeline = use_timeline();
/// (timeline.send_command)(TimelineCommand::ToggleProjection);
/// # html! {}
/// # }
/// ```
#[hook]
pub fn use_timeline() -> TimelineContext {
    use_context::<TimelineContext>().expect("use_timeline must be used within a ProgressProvider")
}

/// Hook to read the current snapshot only (convenience wrapper)
#[hook]
pub fn use_snapshot() -> TimelineSnapshot {
    use_timeline().snapshot
}
