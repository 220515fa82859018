use crate::domain::{ChallengeType, ProcessStatus, StepStatus};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Challenge progress ID (opaque, assigned by the backend)
pub type ProgressId = String;

/// Step ID (unique within its parent progress)
pub type StepId = String;

/// What the user does on a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Expected duration in minutes
    #[serde(default)]
    pub duration: Option<u32>,

    /// Structured guide data (opaque to the timeline)
    #[serde(default)]
    pub instructions: serde_json::Value,
}

/// One daily activity unit of a challenge progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub step_id: StepId,

    /// 1-based offset from the parent's start date
    pub day_number: u32,

    /// Display order within a day
    #[serde(default)]
    pub order_index: i32,

    #[serde(default)]
    pub process_status: StepStatus,

    pub activity: Activity,
}

impl Step {
    /// Calendar date this step lands on: `start + (day_number - 1)` days
    ///
    /// `None` if the day number is zero or the date overflows.
    pub fn date_from(&self, start: NaiveDate) -> Option<NaiveDate> {
        step_date(start, self.day_number)
    }
}

/// Derive a step's calendar date from its challenge start date
pub fn step_date(start: NaiveDate, day_number: u32) -> Option<NaiveDate> {
    let offset = day_number.checked_sub(1)?;
    start.checked_add_days(Days::new(u64::from(offset)))
}

/// ISO `YYYY-MM-DD` key used to group steps
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).map_err(serde::de::Error::custom)
}

/// A user's running instance of a challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    pub id: ProgressId,

    pub challenge_title: String,

    #[serde(default)]
    pub challenge_description: String,

    #[serde(default)]
    pub challenge_media_url: Option<String>,

    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub start_date: NaiveDate,

    #[serde(default)]
    pub process_status: ProcessStatus,

    #[serde(default)]
    pub challenge_type: Option<ChallengeType>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Structural problems in a progress payload
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgressError {
    #[error("Step {step_id} of progress {progress_id} has day number 0")]
    DayNumberZero {
        progress_id: ProgressId,
        step_id: StepId,
    },

    #[error("Step {step_id} appears more than once in progress {progress_id}")]
    DuplicateStep {
        progress_id: ProgressId,
        step_id: StepId,
    },
}

impl ChallengeProgress {
    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.step_id == step_id)
    }

    pub(crate) fn step_mut(&mut self, step_id: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.step_id == step_id)
    }

    /// Calendar date of one of this progress's steps
    pub fn date_of(&self, step: &Step) -> Option<NaiveDate> {
        step.date_from(self.start_date)
    }

    /// Last calendar day covered by any step
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.steps.iter().filter_map(|s| self.date_of(s)).max()
    }

    /// Fraction of steps that are completed or skipped, in `0.0..=1.0`
    pub fn completion_ratio(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let done = self
            .steps
            .iter()
            .filter(|s| s.process_status.is_done())
            .count();
        done as f32 / self.steps.len() as f32
    }

    /// Check the invariants the timeline relies on
    pub fn validate(&self) -> Result<(), ProgressError> {
        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if step.day_number == 0 {
                return Err(ProgressError::DayNumberZero {
                    progress_id: self.id.clone(),
                    step_id: step.step_id.clone(),
                });
            }
            if !seen.insert(step.step_id.as_str()) {
                return Err(ProgressError::DuplicateStep {
                    progress_id: self.id.clone(),
                    step_id: step.step_id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Identifies one step across all progresses
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepKey {
    pub progress_id: ProgressId,
    pub step_id: StepId,
}

impl StepKey {
    pub fn new(progress_id: impl Into<ProgressId>, step_id: impl Into<StepId>) -> Self {
        Self {
            progress_id: progress_id.into(),
            step_id: step_id.into(),
        }
    }
}

impl fmt::Display for StepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.progress_id, self.step_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": "p-1",
            "challengeTitle": "Move More",
            "startDate": "2024-06-01T00:00:00Z",
            "processStatus": "Progressing",
            "steps": [
                {
                    "stepId": "s-1",
                    "dayNumber": 1,
                    "orderIndex": 0,
                    "processStatus": "Completed",
                    "activity": {
                        "name": "Walk",
                        "duration": 20,
                        "instructions": {"steps": ["Put on shoes", "Walk"]}
                    }
                },
                {
                    "stepId": "s-2",
                    "dayNumber": 2,
                    "activity": {"name": "Stretch"}
                }
            ]
        })
    }

    #[test]
    fn test_deserialize_progress() {
        let progress: ChallengeProgress = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(progress.start_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(progress.process_status, ProcessStatus::Progressing);
        assert_eq!(progress.steps.len(), 2);
        assert_eq!(progress.steps[0].process_status, StepStatus::Completed);
        assert_eq!(progress.steps[1].process_status, StepStatus::NotStarted);
        assert_eq!(progress.steps[1].order_index, 0);
        assert!(progress.steps[1].activity.instructions.is_null());
    }

    #[test]
    fn test_plain_date_accepted() {
        let mut json = sample_json();
        json["startDate"] = serde_json::json!("2024-12-31");
        let progress: ChallengeProgress = serde_json::from_value(json).unwrap();
        assert_eq!(progress.start_date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_invalid_date_rejected() {
        let mut json = sample_json();
        json["startDate"] = serde_json::json!("June 1st");
        assert!(serde_json::from_value::<ChallengeProgress>(json).is_err());
    }

    #[test]
    fn test_step_date_crosses_year() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        assert_eq!(step_date(start, 1), Some(start));
        assert_eq!(
            step_date(start, 3),
            Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
        assert_eq!(step_date(start, 0), None);
    }

    #[test]
    fn test_validate_rejects_day_zero() {
        let mut progress: ChallengeProgress = serde_json::from_value(sample_json()).unwrap();
        assert!(progress.validate().is_ok());

        progress.steps[1].day_number = 0;
        assert!(matches!(
            progress.validate(),
            Err(ProgressError::DayNumberZero { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_step() {
        let mut progress: ChallengeProgress = serde_json::from_value(sample_json()).unwrap();
        progress.steps[1].step_id = "s-1".to_string();
        assert!(matches!(
            progress.validate(),
            Err(ProgressError::DuplicateStep { .. })
        ));
    }

    #[test]
    fn test_completion_ratio_and_end_date() {
        let progress: ChallengeProgress = serde_json::from_value(sample_json()).unwrap();
        assert!((progress.completion_ratio() - 0.5).abs() < f32::EPSILON);
        assert_eq!(
            progress.end_date(),
            Some(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())
        );
    }

    #[test]
    fn test_step_key_display() {
        let key = StepKey::new("p-1", "s-9");
        assert_eq!(key.to_string(), "p-1:s-9");
    }
}
