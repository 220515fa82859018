use crate::domain::{ChallengeType, ProcessStatus};
use chrono::NaiveDate;

/// What a filter change requires from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEffect {
    /// Nothing changed
    Unchanged,
    /// Only the local projection needs to be derived again
    Rederive,
    /// The progress list must be fetched again
    Refetch,
}

/// Filter and projection state of the progress screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    process_status: Option<ProcessStatus>,
    challenge_type: Option<ChallengeType>,
    selected_date: Option<NaiveDate>,
    show_by_challenge: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            process_status: None,
            challenge_type: None,
            selected_date: None,
            show_by_challenge: true,
        }
    }
}

impl FilterState {
    pub fn process_status(&self) -> Option<ProcessStatus> {
        self.process_status
    }

    pub fn challenge_type(&self) -> Option<ChallengeType> {
        self.challenge_type
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn show_by_challenge(&self) -> bool {
        self.show_by_challenge
    }

    pub fn is_empty(&self) -> bool {
        self.process_status.is_none() && self.challenge_type.is_none() && self.selected_date.is_none()
    }

    pub fn set_process_status(&mut self, status: Option<ProcessStatus>) -> FilterEffect {
        if self.process_status == status {
            return FilterEffect::Unchanged;
        }
        self.process_status = status;
        FilterEffect::Refetch
    }

    pub fn set_challenge_type(&mut self, challenge_type: Option<ChallengeType>) -> FilterEffect {
        if self.challenge_type == challenge_type {
            return FilterEffect::Unchanged;
        }
        self.challenge_type = challenge_type;
        FilterEffect::Refetch
    }

    pub fn select_date(&mut self, date: Option<NaiveDate>) -> FilterEffect {
        if self.selected_date == date {
            return FilterEffect::Unchanged;
        }
        self.selected_date = date;
        FilterEffect::Rederive
    }

    /// Switch between the "by challenge" and "by date" projections
    ///
    /// Leaving "by challenge" drops the status filter; coming back does not
    /// restore it. Dropping a set status filter counts as a status change.
    pub fn set_show_by_challenge(&mut self, by_challenge: bool) -> FilterEffect {
        if self.show_by_challenge == by_challenge {
            return FilterEffect::Unchanged;
        }
        self.show_by_challenge = by_challenge;
        if !by_challenge && self.process_status.take().is_some() {
            return FilterEffect::Refetch;
        }
        FilterEffect::Rederive
    }

    pub fn toggle_projection(&mut self) -> FilterEffect {
        self.set_show_by_challenge(!self.show_by_challenge)
    }

    /// Reset status, type and date together
    pub fn clear(&mut self) -> FilterEffect {
        let refetch = self.process_status.is_some() || self.challenge_type.is_some();
        let rederive = self.selected_date.is_some();

        self.process_status = None;
        self.challenge_type = None;
        self.selected_date = None;

        if refetch {
            FilterEffect::Refetch
        } else if rederive {
            FilterEffect::Rederive
        } else {
            FilterEffect::Unchanged
        }
    }
}
