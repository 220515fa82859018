use chrono::NaiveDate;
use wellpath_core::api::{ApiError, InMemoryProgressApi};
use wellpath_core::application::LoadState;
use wellpath_core::domain::Activity;
use wellpath_core::{
    ApiConfig, ChallengeProgress, ProcessStatus, Step, StepStatus, TimelineCommand,
    TimelineEvent, TimelineService,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn progress(id: &str, step_ids: &[&str]) -> ChallengeProgress {
    ChallengeProgress {
        id: id.to_string(),
        challenge_title: format!("Challenge {id}"),
        challenge_description: String::new(),
        challenge_media_url: None,
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        process_status: ProcessStatus::Progressing,
        challenge_type: None,
        steps: step_ids
            .iter()
            .enumerate()
            .map(|(i, step_id)| Step {
                step_id: step_id.to_string(),
                day_number: i as u32 + 1,
                order_index: 0,
                process_status: StepStatus::NotStarted,
                activity: Activity {
                    name: step_id.to_string(),
                    description: String::new(),
                    duration: Some(5),
                    instructions: serde_json::Value::Null,
                },
            })
            .collect(),
    }
}

fn set_status(progress_id: &str, step_id: &str, status: StepStatus) -> TimelineCommand {
    TimelineCommand::SetStepStatus {
        progress_id: progress_id.to_string(),
        step_id: step_id.to_string(),
        status,
        post_mood_id: None,
    }
}

#[tokio::test]
async fn test_pages_through_progresses() {
    init_tracing();
    let api = InMemoryProgressApi::new(vec![progress("p-1", &["a"]), progress("p-2", &["b"])]);
    let service = TimelineService::new(api, ApiConfig::default().with_page_size(1));

    service.dispatch(TimelineCommand::Load).await.unwrap();
    let snapshot = service.snapshot();
    assert_eq!(snapshot.progresses[0].id, "p-1");
    assert!(snapshot.has_more);
    assert!(!snapshot.has_previous());

    service.dispatch(TimelineCommand::GoToPage(2)).await.unwrap();
    let snapshot = service.snapshot();
    assert_eq!(snapshot.page_index, 2);
    assert_eq!(snapshot.progresses[0].id, "p-2");
    assert!(!snapshot.has_more);
    assert!(snapshot.has_previous());
}

#[tokio::test]
async fn test_past_last_page_is_refused() {
    init_tracing();
    let api = InMemoryProgressApi::new(vec![progress("p-1", &["a"]), progress("p-2", &["b"])]);
    let service = TimelineService::new(api, ApiConfig::default().with_page_size(1));
    service.dispatch(TimelineCommand::GoToPage(2)).await.unwrap();
    assert_eq!(service.api().progress_fetches(), 1);

    let events = service.dispatch(TimelineCommand::GoToPage(3)).await.unwrap();
    assert!(matches!(
        events.as_slice(),
        [TimelineEvent::CommandFailed { command, .. }] if command == "GoToPage"
    ));

    let snapshot = service.snapshot();
    assert_eq!(service.api().progress_fetches(), 1);
    assert_eq!(snapshot.page_index, 2);
    assert_eq!(snapshot.load_state, LoadState::Loaded);
    assert_eq!(snapshot.progresses[0].id, "p-2");
}

#[tokio::test]
async fn test_overlapping_dispatches_settle_independently() {
    init_tracing();
    let api = InMemoryProgressApi::new(vec![progress("p-1", &["a", "b"])]);
    let service = TimelineService::new(api, ApiConfig::default());
    service.dispatch(TimelineCommand::Load).await.unwrap();

    let (first, second) = futures::join!(
        service.dispatch(set_status("p-1", "a", StepStatus::Completed)),
        service.dispatch(set_status("p-1", "b", StepStatus::Skipped)),
    );
    first.unwrap();
    second.unwrap();

    let snapshot = service.snapshot();
    let steps = &snapshot.progresses[0].steps;
    assert_eq!(steps[0].process_status, StepStatus::Completed);
    assert_eq!(steps[1].process_status, StepStatus::Skipped);
    assert!(snapshot.updating.is_empty());
    assert_eq!(service.api().updates().len(), 2);
}

#[tokio::test]
async fn test_refused_update_leaves_local_status() {
    init_tracing();
    let api = InMemoryProgressApi::new(vec![progress("p-1", &["a"])]);
    let service = TimelineService::new(api, ApiConfig::default());
    service.dispatch(TimelineCommand::Load).await.unwrap();

    service
        .api()
        .fail_next_update(ApiError::http(500, "activity not started"));
    service
        .dispatch(set_status("p-1", "a", StepStatus::Completed))
        .await
        .unwrap();

    let snapshot = service.snapshot();
    assert_eq!(
        snapshot.progresses[0].steps[0].process_status,
        StepStatus::NotStarted
    );
    assert!(snapshot.updating.is_empty());
    assert!(service.api().updates().is_empty());
}

#[tokio::test]
async fn test_retry_after_failed_load() {
    init_tracing();
    let api = InMemoryProgressApi::new(vec![progress("p-1", &["a"])]);
    api.fail_next_fetch(ApiError::http(503, "maintenance"));
    let service = TimelineService::new(api, ApiConfig::default());

    service.dispatch(TimelineCommand::Load).await.unwrap();
    assert!(matches!(service.snapshot().load_state, LoadState::Failed(_)));
    assert!(service.snapshot().progresses.is_empty());

    service.dispatch(TimelineCommand::Retry).await.unwrap();
    assert_eq!(service.snapshot().load_state, LoadState::Loaded);
    assert_eq!(service.api().progress_fetches(), 2);
}
