use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a wire string does not name a known enumeration value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Completion state of a single daily step
///
/// Steps move through [`StepStatus::CYCLE`] one position at a time when the
/// status button is pressed. The picker may jump to any state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StepStatus {
    #[default]
    NotStarted,
    Progressing,
    Completed,
    Skipped,
}

impl StepStatus {
    /// Order walked by [`StepStatus::next`]
    pub const CYCLE: [StepStatus; 4] = [
        StepStatus::NotStarted,
        StepStatus::Progressing,
        StepStatus::Completed,
        StepStatus::Skipped,
    ];

    /// Position of this status inside [`StepStatus::CYCLE`]
    pub fn cycle_index(self) -> usize {
        match self {
            StepStatus::NotStarted => 0,
            StepStatus::Progressing => 1,
            StepStatus::Completed => 2,
            StepStatus::Skipped => 3,
        }
    }

    /// Status following this one in the cycle (wraps after `Skipped`)
    pub fn next(self) -> Self {
        Self::CYCLE[(self.cycle_index() + 1) % Self::CYCLE.len()]
    }

    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::NotStarted => "NotStarted",
            StepStatus::Progressing => "Progressing",
            StepStatus::Completed => "Completed",
            StepStatus::Skipped => "Skipped",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            StepStatus::NotStarted => "Not started",
            StepStatus::Progressing => "In progress",
            StepStatus::Completed => "Completed",
            StepStatus::Skipped => "Skipped",
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CYCLE
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("step status", s))
    }
}

/// Completion state of a whole challenge instance
///
/// Kept separate from [`StepStatus`]: a challenge is never `Skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProcessStatus {
    #[default]
    NotStarted,
    Progressing,
    Completed,
}

impl ProcessStatus {
    pub const ALL: [ProcessStatus; 3] = [
        ProcessStatus::NotStarted,
        ProcessStatus::Progressing,
        ProcessStatus::Completed,
    ];

    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessStatus::NotStarted => "NotStarted",
            ProcessStatus::Progressing => "Progressing",
            ProcessStatus::Completed => "Completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessStatus::NotStarted => "Not started",
            ProcessStatus::Progressing => "In progress",
            ProcessStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("process status", s))
    }
}
