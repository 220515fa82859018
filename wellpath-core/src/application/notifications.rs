//! Typed user-facing notices.
//!
//! The timeline publishes a [`Notice`] for every outcome the user should
//! hear about; the UI subscribes and renders them as toasts.

use crate::application::{TimelineEvent, UpdateFailure};
use crate::domain::{ChallengeId, StepKey, StepStatus};
use chrono::NaiveDate;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoticeKind {
    StepStatusChanged {
        key: StepKey,
        status: StepStatus,
        date: Option<NaiveDate>,
    },
    /// Update refused because the activity's day has not begun
    ActivityNotStarted { key: StepKey },
    StepUpdateFailed { key: StepKey, reason: String },
    LoadFailed { reason: String },
    ChallengeRegistered { challenge_id: ChallengeId },
    RegistrationFailed {
        challenge_id: ChallengeId,
        reason: String,
    },
}

impl NoticeKind {
    /// Notice for a timeline event, if the user should see one
    pub fn from_event(event: &TimelineEvent) -> Option<Self> {
        match event {
            TimelineEvent::StepStatusChanged { key, to, date, .. } => {
                Some(NoticeKind::StepStatusChanged {
                    key: key.clone(),
                    status: *to,
                    date: *date,
                })
            }
            TimelineEvent::StepUpdateFailed { key, failure } => Some(match failure {
                UpdateFailure::NotYetStarted => NoticeKind::ActivityNotStarted { key: key.clone() },
                UpdateFailure::Failed { reason } => NoticeKind::StepUpdateFailed {
                    key: key.clone(),
                    reason: reason.clone(),
                },
            }),
            TimelineEvent::FetchFailed { reason, .. } => Some(NoticeKind::LoadFailed {
                reason: reason.clone(),
            }),
            _ => None,
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            NoticeKind::StepStatusChanged { .. } | NoticeKind::ChallengeRegistered { .. } => {
                NoticeLevel::Success
            }
            NoticeKind::ActivityNotStarted { .. } => NoticeLevel::Warning,
            NoticeKind::StepUpdateFailed { .. }
            | NoticeKind::LoadFailed { .. }
            | NoticeKind::RegistrationFailed { .. } => NoticeLevel::Error,
        }
    }

    pub fn message(&self) -> String {
        match self {
            NoticeKind::StepStatusChanged { status, date, .. } => match date {
                Some(date) => format!("Marked as {} for {}", status.label(), date.format("%b %-d")),
                None => format!("Marked as {}", status.label()),
            },
            NoticeKind::ActivityNotStarted { .. } => {
                "This activity has not started yet".to_string()
            }
            NoticeKind::StepUpdateFailed { .. } => "Could not update the activity".to_string(),
            NoticeKind::LoadFailed { .. } => "Could not load your challenges".to_string(),
            NoticeKind::ChallengeRegistered { .. } => "Challenge added".to_string(),
            NoticeKind::RegistrationFailed { .. } => "Could not join the challenge".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
        }
    }

    pub fn level(&self) -> NoticeLevel {
        self.kind.level()
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }
}

/// Fan-out of notices to every live subscriber
#[derive(Debug, Default)]
pub struct NotificationCenter {
    subscribers: Vec<UnboundedSender<Notice>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<Notice> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver to all subscribers, dropping those whose receiver is gone
    pub fn publish(&mut self, kind: NoticeKind) -> Notice {
        let notice = Notice::new(kind);
        tracing::debug!(level = notice.level().as_str(), message = %notice.message(), "notice");
        self.subscribers
            .retain(|tx| tx.unbounded_send(notice.clone()).is_ok());
        notice
    }

    /// Publish the notice for an event, if any
    pub fn publish_event(&mut self, event: &TimelineEvent) -> Option<Notice> {
        NoticeKind::from_event(event).map(|kind| self.publish(kind))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
