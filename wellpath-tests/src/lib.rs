use chrono::NaiveDate;
use cucumber::World;
use futures::channel::mpsc::UnboundedReceiver;
use std::collections::HashMap;
use wellpath_core::api::InMemoryProgressApi;
use wellpath_core::application::RemoteRequest;
use wellpath_core::domain::{Activity, Challenge};
use wellpath_core::{
    ApiConfig, ChallengeProgress, ChallengeType, Notice, ProcessStatus, Step, StepStatus,
    TimelineCommand, TimelineEvent, TimelineEventLoop, TimelineService, TimelineSnapshot,
};

/// Date every scenario treats as "today"
pub fn scenario_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

pub fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("Invalid date '{}': {}", raw, e))
}

pub fn parse_status(raw: &str) -> StepStatus {
    raw.parse()
        .unwrap_or_else(|e| panic!("Invalid step status '{}': {}", raw, e))
}

pub fn parse_process_status(raw: &str) -> ProcessStatus {
    raw.parse()
        .unwrap_or_else(|e| panic!("Invalid process status '{}': {}", raw, e))
}

pub fn parse_challenge_type(raw: &str) -> ChallengeType {
    raw.parse()
        .unwrap_or_else(|e| panic!("Invalid challenge type '{}': {}", raw, e))
}

#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct TimelineWorld {
    /// Progresses the backend will serve, in insertion order
    pub backend_progresses: Vec<ChallengeProgress>,

    pub backend_challenges: Vec<Challenge>,

    /// Challenge id the page was opened with
    pub deep_link: Option<String>,

    /// Overrides the configured page size
    pub page_size: Option<u32>,

    /// Created on first use so Given steps can shape the backend first
    pub service: Option<TimelineService<InMemoryProgressApi>>,

    pub notices: Option<UnboundedReceiver<Notice>>,

    /// Every notice received so far
    pub received_notices: Vec<Notice>,

    /// Events of the last command (including follow-ups)
    pub last_events: Vec<TimelineEvent>,

    /// Remote requests held back to control completion order
    pub held_requests: HashMap<String, RemoteRequest>,
}

impl TimelineWorld {
    fn new() -> Self {
        Self {
            backend_progresses: Vec::new(),
            backend_challenges: Vec::new(),
            deep_link: None,
            page_size: None,
            service: None,
            notices: None,
            received_notices: Vec::new(),
            last_events: Vec::new(),
            held_requests: HashMap::new(),
        }
    }

    /// Add a step to a backend progress, creating the progress if needed
    pub fn add_step(
        &mut self,
        progress_id: &str,
        title: &str,
        start_date: NaiveDate,
        step_id: &str,
        day_number: u32,
        status: StepStatus,
    ) {
        let index = match self
            .backend_progresses
            .iter()
            .position(|p| p.id == progress_id)
        {
            Some(index) => index,
            None => {
                self.backend_progresses.push(ChallengeProgress {
                    id: progress_id.to_string(),
                    challenge_title: title.to_string(),
                    challenge_description: String::new(),
                    challenge_media_url: None,
                    start_date,
                    process_status: ProcessStatus::Progressing,
                    challenge_type: Some(ChallengeType::SevenDayChallenge),
                    steps: Vec::new(),
                });
                self.backend_progresses.len() - 1
            }
        };

        let progress = &mut self.backend_progresses[index];
        let order_index = progress.steps.len() as i32;
        progress.steps.push(Step {
            step_id: step_id.to_string(),
            day_number,
            order_index,
            process_status: status,
            activity: Activity {
                name: format!("Activity {step_id}"),
                description: String::new(),
                duration: Some(10),
                instructions: serde_json::Value::Null,
            },
        });
    }

    /// The service under test (built on first use)
    pub fn service(&mut self) -> &TimelineService<InMemoryProgressApi> {
        if self.service.is_none() {
            let api = InMemoryProgressApi::new(self.backend_progresses.clone())
                .with_challenges(self.backend_challenges.clone());
            let mut config = ApiConfig::default();
            if let Some(page_size) = self.page_size {
                config = config.with_page_size(page_size);
            }
            let mut event_loop = TimelineEventLoop::new(&config).with_today(scenario_today());
            if let Some(progress_id) = &self.deep_link {
                event_loop = event_loop.with_deep_link(progress_id.clone());
            }
            let service = TimelineService::with_event_loop(api, config, event_loop);
            self.notices = Some(service.subscribe());
            self.service = Some(service);
        }
        self.service.as_ref().unwrap()
    }

    /// Run a command and all follow-up requests until settled
    pub async fn dispatch(&mut self, command: TimelineCommand) -> &[TimelineEvent] {
        let events = self
            .service()
            .dispatch(command)
            .await
            .expect("command queue overflow");
        self.last_events = events;
        self.collect_notices();
        &self.last_events
    }

    /// Queue a command without handling it
    pub fn enqueue(&mut self, command: TimelineCommand) {
        self.service()
            .enqueue(command)
            .expect("command queue overflow");
    }

    /// Handle everything queued, with follow-up requests, until settled
    pub async fn run(&mut self) -> &[TimelineEvent] {
        let events = self.service().run_observed(|_| {}).await;
        self.last_events = events;
        self.collect_notices();
        &self.last_events
    }

    /// Handle a command without performing its remote requests
    pub fn submit(&mut self, command: TimelineCommand) -> Vec<TimelineEvent> {
        let events = self
            .service()
            .submit(command)
            .expect("command queue overflow");
        self.last_events = events.clone();
        self.collect_notices();
        events
    }

    /// Submit and park the resulting remote request under a label
    pub fn hold(&mut self, label: &str, command: TimelineCommand) {
        let request = self
            .submit(command)
            .iter()
            .find_map(TimelineEvent::remote_request)
            .unwrap_or_else(|| panic!("Command for '{}' issued no request", label));
        self.held_requests.insert(label.to_string(), request);
    }

    /// Perform a parked request now and feed its completion back
    pub async fn release(&mut self, label: &str) {
        let request = self
            .held_requests
            .remove(label)
            .unwrap_or_else(|| panic!("No held request '{}'", label));
        let completion = self.service().execute(request).await;
        self.dispatch(completion).await;
    }

    pub fn collect_notices(&mut self) {
        if let Some(receiver) = self.notices.as_mut() {
            while let Ok(Some(notice)) = receiver.try_next() {
                self.received_notices.push(notice);
            }
        }
    }

    pub fn snapshot(&mut self) -> TimelineSnapshot {
        self.service().snapshot()
    }

    pub fn step_status(&mut self, progress_id: &str, step_id: &str) -> StepStatus {
        let snapshot = self.snapshot();
        snapshot
            .progresses
            .iter()
            .find(|p| p.id == progress_id)
            .and_then(|p| p.step(step_id))
            .map(|s| s.process_status)
            .unwrap_or_else(|| panic!("Step {}/{} not loaded", progress_id, step_id))
    }

    pub fn last_command_failed(&self) -> bool {
        self.last_events
            .iter()
            .any(|e| matches!(e, TimelineEvent::CommandFailed { .. }))
    }
}
