use crate::api::{ApiError, Page, ProgressQuery, UpdateStepStatus};
use crate::application::TimelineError;
use crate::domain::{ChallengeProgress, StepKey, StepStatus};
use std::collections::BTreeSet;

/// Loading lifecycle of the progress list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Fetch succeeded with no progresses
    Empty,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// A progress fetch the caller must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Only the completion carrying the latest issued sequence is applied
    pub seq: u64,
    pub query: ProgressQuery,
}

/// A step status update the caller must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub key: StepKey,
    pub status: StepStatus,
    pub post_mood_id: Option<String>,
}

impl UpdateRequest {
    pub fn body(&self) -> UpdateStepStatus {
        UpdateStepStatus {
            challenge_progress_id: self.key.progress_id.clone(),
            step_id: self.key.step_id.clone(),
            step_status: self.status,
            post_mood_id: self.post_mood_id.clone(),
        }
    }
}

/// Result of applying a fetch completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { count: usize },
    Empty,
    /// A newer fetch was issued; this completion was dropped
    Discarded { latest: u64 },
    Failed { reason: String },
}

/// Why a status update did not go through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateFailure {
    /// Backend answered 500: the activity has not started yet
    NotYetStarted,
    Failed { reason: String },
}

impl UpdateFailure {
    pub fn classify(err: &ApiError) -> Self {
        match err.status() {
            Some(500) => UpdateFailure::NotYetStarted,
            _ => UpdateFailure::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// Result of applying an update completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied { from: StepStatus, to: StepStatus },
    Rejected(UpdateFailure),
    /// Accepted remotely but the step vanished locally (list was refreshed)
    Orphaned,
}

/// Sole owner of the progress list
///
/// The list is only written by wholesale replacement after a fetch and by
/// single-step status changes after a successful update.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    progresses: Vec<ChallengeProgress>,
    load_state: LoadState,
    latest_fetch: u64,
    last_query: Option<ProgressQuery>,
    /// Progress count across all pages, when the backend reports it
    total_count: Option<u64>,
    has_more: bool,
    updating: BTreeSet<StepKey>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progresses(&self) -> &[ChallengeProgress] {
        &self.progresses
    }

    pub fn get(&self, progress_id: &str) -> Option<&ChallengeProgress> {
        self.progresses.iter().find(|p| p.id == progress_id)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn last_query(&self) -> Option<&ProgressQuery> {
        self.last_query.as_ref()
    }

    pub fn latest_fetch(&self) -> u64 {
        self.latest_fetch
    }

    /// Whether a page follows the one currently loaded
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Last page index for `page_size`, once the backend has reported a count
    pub fn last_page(&self, page_size: u32) -> Option<u32> {
        let total = self.total_count?;
        let size = u64::from(page_size.max(1));
        let pages = total.div_ceil(size).max(1);
        Some(u32::try_from(pages).unwrap_or(u32::MAX))
    }

    pub fn is_updating(&self, key: &StepKey) -> bool {
        self.updating.contains(key)
    }

    pub fn updating(&self) -> &BTreeSet<StepKey> {
        &self.updating
    }

    /// Start a fetch; any earlier fetch still in flight becomes stale
    pub fn begin_fetch(&mut self, query: ProgressQuery) -> FetchRequest {
        self.latest_fetch += 1;
        self.load_state = LoadState::Loading;
        self.last_query = Some(query.clone());
        FetchRequest {
            seq: self.latest_fetch,
            query,
        }
    }

    pub fn complete_fetch(
        &mut self,
        seq: u64,
        result: Result<Page<ChallengeProgress>, ApiError>,
    ) -> FetchOutcome {
        if seq != self.latest_fetch {
            tracing::warn!(seq, latest = self.latest_fetch, "discarding stale progress fetch");
            return FetchOutcome::Discarded {
                latest: self.latest_fetch,
            };
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => return self.fail(err.to_string()),
        };

        if let Some(err) = page.items.iter().find_map(|p| p.validate().err()) {
            return self.fail(err.to_string());
        }

        self.has_more = self.more_after(&page);
        self.total_count = page.total_count;
        let count = page.items.len();
        self.progresses = page.items;
        if count == 0 {
            self.load_state = LoadState::Empty;
            FetchOutcome::Empty
        } else {
            self.load_state = LoadState::Loaded;
            FetchOutcome::Loaded { count }
        }
    }

    /// Page metadata missing from the response falls back to the query's
    fn more_after(&self, page: &Page<ChallengeProgress>) -> bool {
        let query = self.last_query.as_ref();
        let index = page.page_index.or(query.map(ProgressQuery::page_index));
        let size = page.page_size.or(query.map(ProgressQuery::page_size));
        match (page.total_count, index, size) {
            (Some(total), Some(index), Some(size)) => u64::from(index) * u64::from(size) < total,
            // No count: a full page may have a successor
            (None, _, Some(size)) => size > 0 && page.items.len() >= size as usize,
            _ => false,
        }
    }

    fn fail(&mut self, reason: String) -> FetchOutcome {
        tracing::warn!(%reason, "progress fetch failed");
        self.progresses.clear();
        self.has_more = false;
        self.load_state = LoadState::Failed(reason.clone());
        FetchOutcome::Failed { reason }
    }

    /// Mark a step as updating and describe the request to send
    pub fn begin_update(
        &mut self,
        key: StepKey,
        status: StepStatus,
        post_mood_id: Option<String>,
    ) -> Result<UpdateRequest, TimelineError> {
        let progress = self
            .get(&key.progress_id)
            .ok_or_else(|| TimelineError::ProgressNotFound(key.progress_id.clone()))?;
        if progress.step(&key.step_id).is_none() {
            return Err(TimelineError::StepNotFound(key));
        }
        if self.updating.contains(&key) {
            return Err(TimelineError::StepBusy(key));
        }

        self.updating.insert(key.clone());
        Ok(UpdateRequest {
            key,
            status,
            post_mood_id,
        })
    }

    /// Apply the outcome of an update; the updating flag clears either way
    pub fn complete_update(
        &mut self,
        request: &UpdateRequest,
        result: Result<(), ApiError>,
    ) -> UpdateOutcome {
        self.updating.remove(&request.key);

        if let Err(err) = result {
            return UpdateOutcome::Rejected(UpdateFailure::classify(&err));
        }

        let step = self
            .progresses
            .iter_mut()
            .find(|p| p.id == request.key.progress_id)
            .and_then(|p| p.step_mut(&request.key.step_id));

        match step {
            Some(step) => {
                let from = step.process_status;
                step.process_status = request.status;
                UpdateOutcome::Applied {
                    from,
                    to: request.status,
                }
            }
            None => UpdateOutcome::Orphaned,
        }
    }
}
