use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use wellpath_core::api::ApiError;
use wellpath_core::application::LoadState;
use wellpath_core::{TimelineCommand, TimelineEvent};
use wellpath_tests::{parse_date, parse_status, TimelineWorld};

fn load_state_name(state: &LoadState) -> &'static str {
    match state {
        LoadState::Idle => "Idle",
        LoadState::Loading => "Loading",
        LoadState::Loaded => "Loaded",
        LoadState::Empty => "Empty",
        LoadState::Failed(_) => "Failed",
    }
}

// ===== Given Steps =====

#[given(expr = "a challenge {string} titled {string} starting on {string} with steps:")]
async fn challenge_with_steps(
    world: &mut TimelineWorld,
    step: &Step,
    progress_id: String,
    title: String,
    start_date: String,
) {
    let start_date = parse_date(&start_date);
    let table = step.table.as_ref().expect("Steps table missing");

    // First row is the header
    for row in table.rows.iter().skip(1) {
        let day_number: u32 = row[1]
            .parse()
            .unwrap_or_else(|e| panic!("Invalid day '{}': {}", row[1], e));
        world.add_step(
            &progress_id,
            &title,
            start_date,
            &row[0],
            day_number,
            parse_status(&row[2]),
        );
    }
}

#[given("the backend has no challenges")]
async fn backend_empty(world: &mut TimelineWorld) {
    world.backend_progresses.clear();
}

#[given("the next progress fetch fails")]
async fn next_fetch_fails(world: &mut TimelineWorld) {
    world
        .service()
        .api()
        .fail_next_fetch(ApiError::Transport("connection reset".to_string()));
}

#[given("the timeline is loaded")]
async fn timeline_is_loaded(world: &mut TimelineWorld) {
    world.dispatch(TimelineCommand::Load).await;
}

#[given(expr = "the page size is {int}")]
async fn page_size_is(world: &mut TimelineWorld, page_size: u32) {
    assert!(
        world.service.is_none(),
        "Page size must be set before the timeline starts"
    );
    world.page_size = Some(page_size);
}

#[given(expr = "a fetch {string} is in flight")]
async fn fetch_in_flight(world: &mut TimelineWorld, label: String) {
    world.hold(&label, TimelineCommand::Load);
}

// ===== When Steps =====

#[when("the timeline loads")]
async fn timeline_loads(world: &mut TimelineWorld) {
    world.dispatch(TimelineCommand::Load).await;
}

#[when("the user retries")]
async fn user_retries(world: &mut TimelineWorld) {
    world.dispatch(TimelineCommand::Retry).await;
}

#[when(expr = "the user goes to page {int}")]
async fn goes_to_page(world: &mut TimelineWorld, page_index: u32) {
    world.dispatch(TimelineCommand::GoToPage(page_index)).await;
}

#[when("the user refreshes twice in a row")]
async fn refreshes_twice(world: &mut TimelineWorld) {
    world.enqueue(TimelineCommand::Load);
    world.enqueue(TimelineCommand::Load);
    world.run().await;
}

#[when(expr = "fetch {string} completes")]
async fn fetch_completes(world: &mut TimelineWorld, label: String) {
    world.release(&label).await;
}

// ===== Then Steps =====

#[then(expr = "the load state is {string}")]
async fn load_state_is(world: &mut TimelineWorld, expected: String) {
    let snapshot = world.snapshot();
    assert_eq!(load_state_name(&snapshot.load_state), expected);
}

#[then(expr = "challenge {string} has days {string}")]
async fn challenge_has_days(world: &mut TimelineWorld, progress_id: String, days: String) {
    let snapshot = world.snapshot();
    let section = snapshot
        .by_challenge()
        .into_iter()
        .find(|section| section.progress.id == progress_id)
        .unwrap_or_else(|| panic!("Challenge '{}' not shown", progress_id));

    let keys: Vec<String> = section.days.iter().map(|day| day.key.clone()).collect();
    assert_eq!(keys.join(", "), days);
}

#[then(expr = "page {int} is shown")]
async fn page_is_shown(world: &mut TimelineWorld, page_index: u32) {
    assert_eq!(world.snapshot().page_index, page_index);
}

#[then("a next page is available")]
async fn next_page_available(world: &mut TimelineWorld) {
    assert!(world.snapshot().has_more);
}

#[then("no next page is available")]
async fn no_next_page(world: &mut TimelineWorld) {
    assert!(!world.snapshot().has_more);
}

#[then("no progresses are shown")]
async fn no_progresses(world: &mut TimelineWorld) {
    assert!(world.snapshot().progresses.is_empty());
}

#[then("the last fetch was discarded")]
async fn last_fetch_discarded(world: &mut TimelineWorld) {
    assert!(
        world
            .last_events
            .iter()
            .any(|e| matches!(e, TimelineEvent::FetchDiscarded { .. })),
        "Expected a discarded fetch, got {:?}",
        world.last_events
    );
}

#[then(expr = "the progress list was fetched {int} time(s)")]
async fn progress_fetch_count(world: &mut TimelineWorld, count: usize) {
    assert_eq!(world.service().api().progress_fetches(), count);
}

#[then(expr = "a {string} notice {string} is shown")]
async fn notice_shown(world: &mut TimelineWorld, level: String, message: String) {
    world.collect_notices();
    assert!(
        world
            .received_notices
            .iter()
            .any(|n| n.level().as_str() == level && n.message() == message),
        "No {} notice '{}' in {:?}",
        level,
        message,
        world.received_notices
    );
}
