use crate::domain::{ProgressId, StepKey};
use std::collections::BTreeSet;

/// Key of a day row inside a challenge section
pub fn challenge_day_key(progress_id: &str, date_key: &str) -> String {
    format!("{progress_id}/{date_key}")
}

/// Disclosure state of the rendered timeline tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    challenges: BTreeSet<ProgressId>,
    days: BTreeSet<String>,
    /// At most one task shows its instructions
    task: Option<StepKey>,
    /// Challenge the UI should scroll into view once rendered
    scroll_to: Option<ProgressId>,
}

impl ExpansionState {
    /// Returns whether the challenge is now expanded
    pub fn toggle_challenge(&mut self, progress_id: &str) -> bool {
        toggle(&mut self.challenges, progress_id)
    }

    /// Returns whether the day is now expanded
    pub fn toggle_day(&mut self, key: &str) -> bool {
        toggle(&mut self.days, key)
    }

    /// Expand a task, collapsing any other; toggling the open task closes it
    pub fn toggle_task(&mut self, key: StepKey) -> bool {
        if self.task.as_ref() == Some(&key) {
            self.task = None;
            false
        } else {
            self.task = Some(key);
            true
        }
    }

    pub fn is_challenge_expanded(&self, progress_id: &str) -> bool {
        self.challenges.contains(progress_id)
    }

    pub fn is_day_expanded(&self, key: &str) -> bool {
        self.days.contains(key)
    }

    pub fn is_task_expanded(&self, key: &StepKey) -> bool {
        self.task.as_ref() == Some(key)
    }

    pub fn expanded_task(&self) -> Option<&StepKey> {
        self.task.as_ref()
    }

    pub fn expanded_challenges(&self) -> impl Iterator<Item = &ProgressId> {
        self.challenges.iter()
    }

    /// Reset after a full refresh, optionally force-expanding a deep-linked challenge
    pub fn reset(&mut self, focus: Option<&str>) {
        self.challenges.clear();
        self.days.clear();
        self.task = None;
        if let Some(progress_id) = focus {
            self.challenges.insert(progress_id.to_string());
            self.scroll_to = Some(progress_id.to_string());
        }
    }

    pub fn scroll_request(&self) -> Option<&ProgressId> {
        self.scroll_to.as_ref()
    }

    /// Hand the pending scroll request to the UI (one-shot)
    pub fn take_scroll_request(&mut self) -> Option<ProgressId> {
        self.scroll_to.take()
    }
}

fn toggle(set: &mut BTreeSet<String>, key: &str) -> bool {
    if set.remove(key) {
        false
    } else {
        set.insert(key.to_string());
        true
    }
}
