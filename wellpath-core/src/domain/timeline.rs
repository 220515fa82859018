//! Calendar projections of challenge progress.
//!
//! Both projections borrow from the source list and never modify it. Dates
//! are keyed by their ISO `YYYY-MM-DD` form, so key order is chronological.

use crate::domain::progress::date_key;
use crate::domain::{ChallengeProgress, Step};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Steps of one challenge landing on the same calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeDay<'a> {
    pub key: String,
    pub date: NaiveDate,
    /// Sorted by `order_index`
    pub steps: Vec<&'a Step>,
}

/// A step together with the progress it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedStep<'a> {
    pub progress: &'a ChallengeProgress,
    pub step: &'a Step,
}

/// All steps, across challenges, landing on the same calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroup<'a> {
    pub key: String,
    pub date: NaiveDate,
    pub entries: Vec<DatedStep<'a>>,
}

impl DateGroup<'_> {
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

impl ChallengeDay<'_> {
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}

/// Group one challenge's steps by their computed calendar date
pub fn group_by_challenge(
    progress: &ChallengeProgress,
    selected_date: Option<NaiveDate>,
) -> Vec<ChallengeDay<'_>> {
    let mut days: BTreeMap<String, (NaiveDate, Vec<&Step>)> = BTreeMap::new();

    for step in &progress.steps {
        let Some(date) = progress.date_of(step) else {
            tracing::warn!(
                progress_id = %progress.id,
                step_id = %step.step_id,
                day_number = step.day_number,
                "step has no calendar date, skipping"
            );
            continue;
        };
        if selected_date.is_some_and(|selected| selected != date) {
            continue;
        }
        days.entry(date_key(date))
            .or_insert_with(|| (date, Vec::new()))
            .1
            .push(step);
    }

    days.into_iter()
        .map(|(key, (date, mut steps))| {
            steps.sort_by_key(|s| s.order_index);
            ChallengeDay { key, date, steps }
        })
        .collect()
}

/// Flatten every step of every challenge into one date-keyed list
///
/// Within a day, entries keep the order of the source list and are then
/// sorted by `order_index`.
pub fn group_by_date(
    progresses: &[ChallengeProgress],
    selected_date: Option<NaiveDate>,
) -> Vec<DateGroup<'_>> {
    let mut groups: BTreeMap<String, (NaiveDate, Vec<DatedStep<'_>>)> = BTreeMap::new();

    for progress in progresses {
        for step in &progress.steps {
            let Some(date) = progress.date_of(step) else {
                continue;
            };
            if selected_date.is_some_and(|selected| selected != date) {
                continue;
            }
            groups
                .entry(date_key(date))
                .or_insert_with(|| (date, Vec::new()))
                .1
                .push(DatedStep { progress, step });
        }
    }

    groups
        .into_iter()
        .map(|(key, (date, mut entries))| {
            entries.sort_by_key(|e| e.step.order_index);
            DateGroup { key, date, entries }
        })
        .collect()
}

/// Every distinct date any step lands on, ascending (feeds the date picker)
pub fn step_dates(progresses: &[ChallengeProgress]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = progresses
        .iter()
        .flat_map(|p| p.steps.iter().filter_map(move |s| p.date_of(s)))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
