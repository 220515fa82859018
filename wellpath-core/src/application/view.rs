use crate::application::{ExpansionState, FilterState, LoadState};
use crate::domain::{
    group_by_challenge, group_by_date, step_dates, ChallengeDay, ChallengeProgress, DateGroup,
    StepKey,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Read-only copy of the timeline for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineSnapshot {
    pub progresses: Vec<ChallengeProgress>,
    pub filters: FilterState,
    pub expansion: ExpansionState,
    pub load_state: LoadState,
    pub updating: BTreeSet<StepKey>,
    pub page_index: u32,
    /// A page follows the current one
    pub has_more: bool,
    pub today: NaiveDate,
}

/// One challenge section of the "by challenge" projection
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeSection<'a> {
    pub progress: &'a ChallengeProgress,
    pub days: Vec<ChallengeDay<'a>>,
}

impl TimelineSnapshot {
    pub fn is_updating(&self, key: &StepKey) -> bool {
        self.updating.contains(key)
    }

    /// Challenges with their days; with a selected date, challenges with
    /// nothing on that date are left out
    pub fn by_challenge(&self) -> Vec<ChallengeSection<'_>> {
        let selected = self.filters.selected_date();
        self.progresses
            .iter()
            .map(|progress| ChallengeSection {
                progress,
                days: group_by_challenge(progress, selected),
            })
            .filter(|section| selected.is_none() || !section.days.is_empty())
            .collect()
    }

    pub fn by_date(&self) -> Vec<DateGroup<'_>> {
        group_by_date(&self.progresses, self.filters.selected_date())
    }

    /// Dates that have at least one step, for the date picker
    pub fn marked_dates(&self) -> Vec<NaiveDate> {
        step_dates(&self.progresses)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 1
    }

    pub fn scroll_request(&self) -> Option<&str> {
        self.expansion.scroll_request().map(String::as_str)
    }
}
