use crate::api::{
    ApiError, CatalogQuery, Page, ProgressApi, ProgressQuery, RegisterChallenge, UpdateStepStatus,
};
use crate::domain::{Challenge, ChallengeProgress};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    progresses: Vec<ChallengeProgress>,
    challenges: Vec<Challenge>,
    fetch_failures: VecDeque<ApiError>,
    update_failures: VecDeque<ApiError>,
    register_failures: VecDeque<ApiError>,
    updates: Vec<UpdateStepStatus>,
    registrations: Vec<(RegisterChallenge, Uuid)>,
    progress_fetches: usize,
    catalog_fetches: usize,
}

/// In-memory backend (for tests and offline demos)
///
/// Failures are scripted per endpoint and consumed one per call.
#[derive(Debug, Default)]
pub struct InMemoryProgressApi {
    state: RefCell<MemoryState>,
}

fn page_of<T: Clone>(items: &[T], page_index: u32, page_size: u32) -> Page<T> {
    let size = page_size as usize;
    let start = (page_index as usize - 1).saturating_mul(size);
    Page {
        items: items.iter().skip(start).take(size).cloned().collect(),
        page_index: Some(page_index),
        page_size: Some(page_size),
        total_count: Some(items.len() as u64),
    }
}

impl InMemoryProgressApi {
    pub fn new(progresses: Vec<ChallengeProgress>) -> Self {
        Self::default().with_progresses(progresses)
    }

    pub fn with_progresses(self, progresses: Vec<ChallengeProgress>) -> Self {
        self.state.borrow_mut().progresses = progresses;
        self
    }

    pub fn with_challenges(self, challenges: Vec<Challenge>) -> Self {
        self.state.borrow_mut().challenges = challenges;
        self
    }

    /// Replace the server-side data (simulates changes made elsewhere)
    pub fn set_progresses(&self, progresses: Vec<ChallengeProgress>) {
        self.state.borrow_mut().progresses = progresses;
    }

    pub fn fail_next_fetch(&self, err: ApiError) {
        self.state.borrow_mut().fetch_failures.push_back(err);
    }

    pub fn fail_next_update(&self, err: ApiError) {
        self.state.borrow_mut().update_failures.push_back(err);
    }

    pub fn fail_next_registration(&self, err: ApiError) {
        self.state.borrow_mut().register_failures.push_back(err);
    }

    /// Successful update requests, in arrival order
    pub fn updates(&self) -> Vec<UpdateStepStatus> {
        self.state.borrow().updates.clone()
    }

    pub fn registrations(&self) -> Vec<(RegisterChallenge, Uuid)> {
        self.state.borrow().registrations.clone()
    }

    pub fn progress_fetches(&self) -> usize {
        self.state.borrow().progress_fetches
    }

    pub fn catalog_fetches(&self) -> usize {
        self.state.borrow().catalog_fetches
    }
}

#[async_trait(?Send)]
impl ProgressApi for InMemoryProgressApi {
    async fn fetch_progresses(
        &self,
        query: &ProgressQuery,
    ) -> Result<Page<ChallengeProgress>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.progress_fetches += 1;
        if let Some(err) = state.fetch_failures.pop_front() {
            return Err(err);
        }

        let matching: Vec<ChallengeProgress> = state
            .progresses
            .iter()
            .filter(|p| query.process_status.map_or(true, |s| p.process_status == s))
            .filter(|p| {
                query
                    .challenge_type
                    .map_or(true, |t| p.challenge_type == Some(t))
            })
            .cloned()
            .collect();

        Ok(page_of(&matching, query.page_index(), query.page_size()))
    }

    async fn update_step_status(&self, request: &UpdateStepStatus) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.update_failures.pop_front() {
            return Err(err);
        }

        let step = state
            .progresses
            .iter_mut()
            .find(|p| p.id == request.challenge_progress_id)
            .and_then(|p| p.step_mut(&request.step_id))
            .ok_or_else(|| ApiError::http(404, "step not found"))?;
        step.process_status = request.step_status;

        state.updates.push(request.clone());
        Ok(())
    }

    async fn register_challenge(
        &self,
        request: &RegisterChallenge,
        idempotency_key: Uuid,
    ) -> Result<(), ApiError> {
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.register_failures.pop_front() {
            return Err(err);
        }
        if !state.challenges.iter().any(|c| c.id == request.challenge_id) {
            return Err(ApiError::http(404, "challenge not found"));
        }
        // Replays with the same key are accepted once
        if state
            .registrations
            .iter()
            .any(|(_, key)| *key == idempotency_key)
        {
            return Ok(());
        }
        state.registrations.push((request.clone(), idempotency_key));
        Ok(())
    }

    async fn fetch_challenges(&self, query: &CatalogQuery) -> Result<Page<Challenge>, ApiError> {
        let mut state = self.state.borrow_mut();
        state.catalog_fetches += 1;

        let matching: Vec<Challenge> = state
            .challenges
            .iter()
            .filter(|c| query.challenge_type.map_or(true, |t| c.challenge_type == t))
            .filter(|c| {
                query
                    .improvement_tag
                    .map_or(true, |tag| c.improvement_tag == Some(tag))
            })
            .cloned()
            .collect();

        Ok(page_of(&matching, query.page_index(), query.page_size()))
    }
}
