use crate::api::{ApiError, CatalogQuery, Page, ProgressApi, QueryError, RegisterChallenge};
use crate::application::runtime::{QueueError, TimelineLoop};
use crate::application::{
    CatalogCache, Notice, NoticeKind, NotificationCenter, RemoteRequest, TimelineCommand,
    TimelineEvent, TimelineEventLoop, TimelineSnapshot,
};
use crate::config::ApiConfig;
use crate::domain::{Challenge, ChallengeId, ChallengeType, ImprovementTag};
use futures::channel::mpsc::UnboundedReceiver;
use futures::future::join_all;
use std::cell::RefCell;
use uuid::Uuid;

const BATCH_SIZE: usize = 16;

/// Drives the timeline against a backend
///
/// Single-threaded. State lives behind `RefCell`s that are never borrowed
/// across an `.await`, so overlapping dispatches interleave safely.
#[derive(Debug)]
pub struct TimelineService<A> {
    api: A,
    config: ApiConfig,
    timeline: RefCell<TimelineLoop>,
    notices: RefCell<NotificationCenter>,
    catalog: RefCell<CatalogCache>,
}

impl<A: ProgressApi> TimelineService<A> {
    pub fn new(api: A, config: ApiConfig) -> Self {
        let event_loop = TimelineEventLoop::new(&config);
        Self::with_event_loop(api, config, event_loop)
    }

    pub fn with_event_loop(api: A, config: ApiConfig, event_loop: TimelineEventLoop) -> Self {
        let catalog = CatalogCache::new(config.catalog_capacity, config.catalog_ttl);
        Self {
            api,
            timeline: RefCell::new(TimelineLoop::new(event_loop, BATCH_SIZE, config.queue_capacity)),
            notices: RefCell::new(NotificationCenter::new()),
            catalog: RefCell::new(catalog),
            config,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn subscribe(&self) -> UnboundedReceiver<Notice> {
        self.notices.borrow_mut().subscribe()
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        self.timeline.borrow().event_loop().snapshot()
    }

    /// Queue a command without handling it
    ///
    /// Fails when the queue is full. A refresh queued right behind another
    /// refresh is merged into it.
    pub fn enqueue(&self, command: TimelineCommand) -> Result<(), QueueError> {
        self.timeline.borrow_mut().submit(command)
    }

    pub fn pending(&self) -> usize {
        self.timeline.borrow().pending()
    }

    /// Handle everything queued so far; remote work is only described
    pub fn process(&self) -> Vec<TimelineEvent> {
        let events = {
            let mut timeline = self.timeline.borrow_mut();
            while timeline.poll() > 0 {}
            timeline.drain_events()
        };

        let mut notices = self.notices.borrow_mut();
        for event in &events {
            notices.publish_event(event);
        }
        events
    }

    /// Queue one command and handle the queue synchronously
    pub fn submit(&self, command: TimelineCommand) -> Result<Vec<TimelineEvent>, QueueError> {
        self.enqueue(command)?;
        Ok(self.process())
    }

    /// Perform one remote request and turn its result into a command
    pub async fn execute(&self, request: RemoteRequest) -> TimelineCommand {
        match request {
            RemoteRequest::Fetch(fetch) => {
                tracing::debug!(seq = fetch.seq, "fetching progresses");
                let result = self.api.fetch_progresses(&fetch.query).await;
                TimelineCommand::FetchCompleted {
                    seq: fetch.seq,
                    result,
                }
            }
            RemoteRequest::Update(request) => {
                tracing::debug!(step = %request.key, status = %request.status, "updating step");
                let result = self.api.update_step_status(&request.body()).await;
                TimelineCommand::UpdateCompleted { request, result }
            }
        }
    }

    pub async fn dispatch(
        &self,
        command: TimelineCommand,
    ) -> Result<Vec<TimelineEvent>, QueueError> {
        self.dispatch_observed(command, |_| {}).await
    }

    /// Queue a command, then run the queue until settled
    ///
    /// `observe` sees a fresh snapshot after each synchronous step, so the UI
    /// can show loading and updating states while requests are in flight.
    pub async fn dispatch_observed<F>(
        &self,
        command: TimelineCommand,
        observe: F,
    ) -> Result<Vec<TimelineEvent>, QueueError>
    where
        F: Fn(&TimelineSnapshot),
    {
        self.enqueue(command)?;
        Ok(self.run_observed(observe).await)
    }

    /// Handle queued commands and every follow-up they trigger until settled
    ///
    /// Remote results re-enter through the queue; completions are never
    /// rejected for capacity.
    pub async fn run_observed<F>(&self, observe: F) -> Vec<TimelineEvent>
    where
        F: Fn(&TimelineSnapshot),
    {
        let mut all_events = Vec::new();

        loop {
            let events = self.process();
            if events.is_empty() {
                break;
            }
            observe(&self.snapshot());

            let requests: Vec<RemoteRequest> =
                events.iter().filter_map(TimelineEvent::remote_request).collect();
            all_events.extend(events);
            if requests.is_empty() {
                break;
            }

            let completions = join_all(requests.into_iter().map(|r| self.execute(r))).await;
            for completion in completions {
                if let Err(e) = self.enqueue(completion) {
                    tracing::error!(error = %e, "completion dropped");
                }
            }
        }

        all_events
    }

    pub fn catalog_query(
        &self,
        challenge_type: Option<ChallengeType>,
        improvement_tag: Option<ImprovementTag>,
        page_index: u32,
    ) -> Result<CatalogQuery, QueryError> {
        CatalogQuery::new(
            challenge_type,
            improvement_tag,
            page_index,
            self.config.page_size,
            self.config.target_lang.clone(),
        )
    }

    /// Catalog page, from cache when fresh
    pub async fn browse_catalog(&self, query: CatalogQuery) -> Result<Page<Challenge>, ApiError> {
        if let Some(page) = self.catalog.borrow_mut().get(&query) {
            tracing::debug!(?query, "catalog cache hit");
            return Ok(page);
        }

        let page = self.api.fetch_challenges(&query).await?;
        self.catalog.borrow_mut().insert(query, page.clone());
        Ok(page)
    }

    /// Join a challenge, then refresh the timeline
    pub async fn register(&self, challenge_id: ChallengeId) -> Result<(), ApiError> {
        let request = RegisterChallenge {
            challenge_id: challenge_id.clone(),
        };
        let idempotency_key = Uuid::new_v4();

        match self.api.register_challenge(&request, idempotency_key).await {
            Ok(()) => {
                tracing::info!(%challenge_id, "registered for challenge");
                self.catalog.borrow_mut().invalidate_all();
                self.notices
                    .borrow_mut()
                    .publish(NoticeKind::ChallengeRegistered { challenge_id });
                if let Err(e) = self.dispatch(TimelineCommand::Load).await {
                    tracing::warn!(error = %e, "could not refresh after registration");
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%challenge_id, error = %e, "registration failed");
                self.notices.borrow_mut().publish(NoticeKind::RegistrationFailed {
                    challenge_id,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InMemoryProgressApi;
    use crate::application::LoadState;
    use crate::domain::{Activity, ChallengeProgress, ProcessStatus, Step, StepStatus};
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn progress(id: &str) -> ChallengeProgress {
        ChallengeProgress {
            id: id.to_string(),
            challenge_title: id.to_string(),
            challenge_description: String::new(),
            challenge_media_url: None,
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            process_status: ProcessStatus::Progressing,
            challenge_type: Some(ChallengeType::OneDayChallenge),
            steps: vec![Step {
                step_id: "s-1".to_string(),
                day_number: 1,
                order_index: 0,
                process_status: StepStatus::NotStarted,
                activity: Activity {
                    name: "Breathe".to_string(),
                    description: String::new(),
                    duration: Some(3),
                    instructions: serde_json::Value::Null,
                },
            }],
        }
    }

    #[tokio::test]
    async fn test_dispatch_load_settles() {
        let service = TimelineService::new(
            InMemoryProgressApi::new(vec![progress("p-1")]),
            ApiConfig::default(),
        );
        let states = RefCell::new(Vec::new());

        service
            .dispatch_observed(TimelineCommand::Load, |snapshot| {
                states.borrow_mut().push(snapshot.load_state.clone())
            })
            .await
            .unwrap();

        assert_eq!(
            states.into_inner(),
            vec![LoadState::Loading, LoadState::Loaded]
        );
        assert_eq!(service.api().progress_fetches(), 1);
    }

    #[tokio::test]
    async fn test_queued_refreshes_fetch_once() {
        let service = TimelineService::new(
            InMemoryProgressApi::new(vec![progress("p-1")]),
            ApiConfig::default(),
        );

        service.enqueue(TimelineCommand::Load).unwrap();
        service.enqueue(TimelineCommand::Load).unwrap();
        service.enqueue(TimelineCommand::Retry).unwrap();
        assert_eq!(service.pending(), 1);

        let events = service.run_observed(|_| {}).await;
        let fetches: Vec<u64> = events
            .iter()
            .filter_map(|event| match event {
                TimelineEvent::FetchRequested(request) => Some(request.seq),
                _ => None,
            })
            .collect();
        assert_eq!(fetches, vec![1]);
        assert_eq!(service.api().progress_fetches(), 1);
        assert_eq!(service.snapshot().load_state, LoadState::Loaded);
        assert_eq!(service.pending(), 0);
    }

    #[tokio::test]
    async fn test_enqueue_past_capacity_rejected() {
        let service = TimelineService::new(
            InMemoryProgressApi::new(vec![progress("p-1")]),
            ApiConfig::default().with_queue_capacity(3),
        );

        for _ in 0..3 {
            service.enqueue(TimelineCommand::ToggleProjection).unwrap();
        }
        assert!(matches!(
            service.enqueue(TimelineCommand::ToggleProjection),
            Err(QueueError::Full { max: 3, .. })
        ));
        assert!(service.dispatch(TimelineCommand::Load).await.is_err());

        // Draining makes room again
        assert_eq!(service.process().len(), 3);
        service.dispatch(TimelineCommand::Load).await.unwrap();
        assert_eq!(service.snapshot().load_state, LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_advance_publishes_notice() {
        let service = TimelineService::new(
            InMemoryProgressApi::new(vec![progress("p-1")]),
            ApiConfig::default(),
        );
        let mut notices = service.subscribe();
        service.dispatch(TimelineCommand::Load).await.unwrap();

        service
            .dispatch(TimelineCommand::AdvanceStep {
                progress_id: "p-1".to_string(),
                step_id: "s-1".to_string(),
                day_number: 1,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            })
            .await
            .unwrap();

        let notice = notices.try_next().unwrap().unwrap();
        assert!(matches!(
            notice.kind,
            NoticeKind::StepStatusChanged {
                status: StepStatus::Progressing,
                ..
            }
        ));
        assert_eq!(
            service.snapshot().progresses[0].steps[0].process_status,
            StepStatus::Progressing
        );
    }

    #[tokio::test]
    async fn test_catalog_served_from_cache() {
        let service = TimelineService::new(InMemoryProgressApi::default(), ApiConfig::default());
        let query = service.catalog_query(None, None, 1).unwrap();

        service.browse_catalog(query.clone()).await.unwrap();
        service.browse_catalog(query).await.unwrap();
        assert_eq!(service.api().catalog_fetches(), 1);
    }

    #[tokio::test]
    async fn test_registration_refreshes_and_invalidates() {
        let api = InMemoryProgressApi::default().with_challenges(vec![Challenge {
            id: "c-1".to_string(),
            name: "Walk".to_string(),
            description: String::new(),
            media_url: None,
            challenge_type: ChallengeType::SevenDayChallenge,
            improvement_tag: Some(ImprovementTag::PhysicalBalance),
            total_steps: Some(7),
        }]);
        let service = TimelineService::new(api, ApiConfig::default());
        let query = service.catalog_query(None, None, 1).unwrap();
        service.browse_catalog(query.clone()).await.unwrap();

        let mut notices = service.subscribe();
        service.register("c-1".to_string()).await.unwrap();

        assert_eq!(service.api().registrations().len(), 1);
        assert_eq!(service.api().progress_fetches(), 1);
        assert!(matches!(
            notices.try_next().unwrap().unwrap().kind,
            NoticeKind::ChallengeRegistered { .. }
        ));

        service.browse_catalog(query).await.unwrap();
        assert_eq!(service.api().catalog_fetches(), 2);
    }

    #[tokio::test]
    async fn test_failed_registration_notifies() {
        let service = TimelineService::new(InMemoryProgressApi::default(), ApiConfig::default());
        let mut notices = service.subscribe();

        let err = service.register("missing".to_string()).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(
            notices.try_next().unwrap().unwrap().kind,
            NoticeKind::RegistrationFailed { .. }
        ));
        assert_eq!(service.api().progress_fetches(), 0);
    }

    #[tokio::test]
    async fn test_observer_called_per_step() {
        let service = TimelineService::new(
            InMemoryProgressApi::new(vec![progress("p-1")]),
            ApiConfig::default(),
        );
        let calls = Cell::new(0);
        service
            .dispatch_observed(TimelineCommand::ToggleProjection, |_| {
                calls.set(calls.get() + 1)
            })
            .await
            .unwrap();
        assert_eq!(calls.get(), 1);
    }
}
