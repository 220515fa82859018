use crate::api::{ApiError, Page, ProgressQuery};
use crate::application::{
    ExpansionState, FetchOutcome, FetchRequest, FilterEffect, FilterState, ProgressStore,
    TimelineCommand, TimelineError, TimelineEvent, TimelineSnapshot, UpdateOutcome, UpdateRequest,
};
use crate::config::ApiConfig;
use crate::domain::{
    step_date, today, ChallengeProgress, ProgressId, StepKey, StepStatus,
};
use chrono::NaiveDate;

/// Timeline event loop that processes commands and emits events
///
/// Purely synchronous: remote work is described by the emitted events and
/// its results come back as `FetchCompleted` / `UpdateCompleted` commands.
#[derive(Debug, Clone)]
pub struct TimelineEventLoop {
    store: ProgressStore,
    filters: FilterState,
    expansion: ExpansionState,
    page_index: u32,
    page_size: u32,
    target_lang: String,
    /// Challenge to expand once a load contains it
    deep_link: Option<ProgressId>,
    today: NaiveDate,
}

impl Default for TimelineEventLoop {
    fn default() -> Self {
        Self::new(&ApiConfig::default())
    }
}

impl TimelineEventLoop {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            store: ProgressStore::new(),
            filters: FilterState::default(),
            expansion: ExpansionState::default(),
            page_index: 1,
            page_size: config.page_size,
            target_lang: config.target_lang.clone(),
            deep_link: None,
            today: today(),
        }
    }

    pub fn with_deep_link(mut self, progress_id: impl Into<ProgressId>) -> Self {
        self.deep_link = Some(progress_id.into());
        self
    }

    /// Pin "today" (highlighting only)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn pending_deep_link(&self) -> Option<&ProgressId> {
        self.deep_link.as_ref()
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            progresses: self.store.progresses().to_vec(),
            filters: self.filters.clone(),
            expansion: self.expansion.clone(),
            load_state: self.store.load_state().clone(),
            updating: self.store.updating().clone(),
            page_index: self.page_index,
            has_more: self.store.has_more(),
            today: self.today,
        }
    }

    /// Process a single command and return the resulting event
    pub fn handle_command(&mut self, command: TimelineCommand) -> TimelineEvent {
        tracing::debug!(command = command.name(), "handling timeline command");
        let name = command.name();

        let result = match command {
            TimelineCommand::Load => self.handle_load(self.page_index),
            TimelineCommand::GoToPage(page_index) => self.handle_load(page_index),
            TimelineCommand::Retry => Ok(self.handle_retry()),
            TimelineCommand::FetchCompleted { seq, result } => {
                Ok(self.handle_fetch_completed(seq, result))
            }

            TimelineCommand::SetProcessStatusFilter(status) => {
                let effect = self.filters.set_process_status(status);
                self.filters_changed(effect)
            }
            TimelineCommand::SetChallengeTypeFilter(challenge_type) => {
                let effect = self.filters.set_challenge_type(challenge_type);
                self.filters_changed(effect)
            }
            TimelineCommand::SelectDate(date) => {
                let effect = self.filters.select_date(date);
                self.filters_changed(effect)
            }
            TimelineCommand::SetShowByChallenge(by_challenge) => {
                let effect = self.filters.set_show_by_challenge(by_challenge);
                self.filters_changed(effect)
            }
            TimelineCommand::ToggleProjection => {
                let effect = self.filters.toggle_projection();
                self.filters_changed(effect)
            }
            TimelineCommand::ClearFilters => {
                let effect = self.filters.clear();
                self.filters_changed(effect)
            }

            TimelineCommand::ToggleChallenge(progress_id) => {
                self.expansion.toggle_challenge(&progress_id);
                Ok(TimelineEvent::ExpansionChanged)
            }
            TimelineCommand::ToggleDay(key) => {
                self.expansion.toggle_day(&key);
                Ok(TimelineEvent::ExpansionChanged)
            }
            TimelineCommand::ToggleTask(key) => {
                self.expansion.toggle_task(key);
                Ok(TimelineEvent::ExpansionChanged)
            }
            TimelineCommand::ScrollHandled => Ok(match self.expansion.take_scroll_request() {
                Some(_) => TimelineEvent::ExpansionChanged,
                None => TimelineEvent::Unchanged,
            }),

            TimelineCommand::AdvanceStep {
                progress_id,
                step_id,
                day_number,
                start_date,
            } => self.handle_advance_step(progress_id, step_id, day_number, start_date),
            TimelineCommand::SetStepStatus {
                progress_id,
                step_id,
                status,
                post_mood_id,
            } => self
                .store
                .begin_update(StepKey::new(progress_id, step_id), status, post_mood_id)
                .map(TimelineEvent::UpdateRequested),
            TimelineCommand::UpdateCompleted { request, result } => {
                Ok(self.handle_update_completed(request, result))
            }
        };

        result.unwrap_or_else(|e| {
            tracing::warn!(command = name, error = %e, "timeline command failed");
            TimelineEvent::CommandFailed {
                command: name.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn query(&self, page_index: u32) -> Result<ProgressQuery, TimelineError> {
        Ok(ProgressQuery::new(
            self.filters.process_status(),
            self.filters.challenge_type(),
            page_index,
            self.page_size,
            self.target_lang.clone(),
        )?)
    }

    fn handle_load(&mut self, page_index: u32) -> Result<TimelineEvent, TimelineError> {
        let query = self.query(page_index)?;
        if let Some(last) = self.store.last_page(self.page_size) {
            if page_index > last {
                return Err(TimelineError::PageOutOfRange {
                    page: page_index,
                    last,
                });
            }
        }
        self.page_index = page_index;
        Ok(TimelineEvent::FetchRequested(self.store.begin_fetch(query)))
    }

    fn handle_retry(&mut self) -> TimelineEvent {
        let query = match self.store.last_query() {
            Some(query) => query.clone(),
            None => match self.query(self.page_index) {
                Ok(query) => query,
                Err(e) => {
                    return TimelineEvent::CommandFailed {
                        command: "Retry".to_string(),
                        reason: e.to_string(),
                    }
                }
            },
        };
        TimelineEvent::FetchRequested(self.store.begin_fetch(query))
    }

    fn filters_changed(&mut self, effect: FilterEffect) -> Result<TimelineEvent, TimelineError> {
        match effect {
            FilterEffect::Unchanged => Ok(TimelineEvent::Unchanged),
            FilterEffect::Rederive => Ok(TimelineEvent::FiltersChanged { fetch: None }),
            FilterEffect::Refetch => {
                let query = self.query(1)?;
                self.page_index = 1;
                let fetch: FetchRequest = self.store.begin_fetch(query);
                Ok(TimelineEvent::FiltersChanged { fetch: Some(fetch) })
            }
        }
    }

    fn handle_fetch_completed(
        &mut self,
        seq: u64,
        result: Result<Page<ChallengeProgress>, ApiError>,
    ) -> TimelineEvent {
        match self.store.complete_fetch(seq, result) {
            FetchOutcome::Discarded { latest } => TimelineEvent::FetchDiscarded { seq, latest },
            FetchOutcome::Failed { reason } => {
                self.expansion.reset(None);
                TimelineEvent::FetchFailed { seq, reason }
            }
            FetchOutcome::Empty => {
                self.expansion.reset(None);
                TimelineEvent::ProgressesEmpty { seq }
            }
            FetchOutcome::Loaded { count } => {
                let focused = self.consume_deep_link();
                self.expansion.reset(focused.as_deref());
                tracing::info!(seq, count, focused = ?focused, "progresses loaded");
                TimelineEvent::ProgressesLoaded {
                    seq,
                    count,
                    focused,
                }
            }
        }
    }

    /// Take the deep link if the freshly loaded list contains it
    ///
    /// The date filter is dropped so the linked challenge is not hidden.
    fn consume_deep_link(&mut self) -> Option<ProgressId> {
        let wanted = self.deep_link.as_deref()?;
        self.store.get(wanted)?;
        self.filters.set_show_by_challenge(true);
        self.filters.select_date(None);
        self.deep_link.take()
    }

    fn handle_advance_step(
        &mut self,
        progress_id: ProgressId,
        step_id: String,
        day_number: u32,
        start_date: NaiveDate,
    ) -> Result<TimelineEvent, TimelineError> {
        let key = StepKey::new(progress_id, step_id);
        let current = self.current_status(&key)?;
        let next = current.next();

        tracing::debug!(
            step = %key,
            date = ?step_date(start_date, day_number),
            from = %current,
            to = %next,
            "advancing step"
        );
        self.store
            .begin_update(key, next, None)
            .map(TimelineEvent::UpdateRequested)
    }

    fn current_status(&self, key: &StepKey) -> Result<StepStatus, TimelineError> {
        let progress = self
            .store
            .get(&key.progress_id)
            .ok_or_else(|| TimelineError::ProgressNotFound(key.progress_id.clone()))?;
        progress
            .step(&key.step_id)
            .map(|step| step.process_status)
            .ok_or_else(|| TimelineError::StepNotFound(key.clone()))
    }

    fn handle_update_completed(
        &mut self,
        request: UpdateRequest,
        result: Result<(), ApiError>,
    ) -> TimelineEvent {
        match self.store.complete_update(&request, result) {
            UpdateOutcome::Applied { from, to } => {
                let date = self.store.get(&request.key.progress_id).and_then(|p| {
                    p.step(&request.key.step_id)
                        .and_then(|step| p.date_of(step))
                });
                tracing::info!(step = %request.key, %from, %to, "step status changed");
                TimelineEvent::StepStatusChanged {
                    key: request.key,
                    from,
                    to,
                    date,
                }
            }
            UpdateOutcome::Rejected(failure) => {
                tracing::warn!(step = %request.key, ?failure, "step update rejected");
                TimelineEvent::StepUpdateFailed {
                    key: request.key,
                    failure,
                }
            }
            UpdateOutcome::Orphaned => {
                tracing::warn!(step = %request.key, "updated step no longer loaded");
                TimelineEvent::Unchanged
            }
        }
    }
}
