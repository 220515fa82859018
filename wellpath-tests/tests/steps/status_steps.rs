use cucumber::{given, then, when};
use wellpath_core::api::ApiError;
use wellpath_core::{StepKey, TimelineCommand};
use wellpath_tests::{parse_status, TimelineWorld};

fn advance_command(world: &mut TimelineWorld, progress_id: &str, step_id: &str) -> TimelineCommand {
    let snapshot = world.snapshot();
    let progress = snapshot
        .progresses
        .iter()
        .find(|p| p.id == progress_id)
        .unwrap_or_else(|| panic!("Challenge '{}' not loaded", progress_id));
    let step = progress
        .step(step_id)
        .unwrap_or_else(|| panic!("Step '{}' not loaded", step_id));

    TimelineCommand::AdvanceStep {
        progress_id: progress_id.to_string(),
        step_id: step_id.to_string(),
        day_number: step.day_number,
        start_date: progress.start_date,
    }
}

fn set_status_command(progress_id: &str, step_id: &str, status: &str) -> TimelineCommand {
    TimelineCommand::SetStepStatus {
        progress_id: progress_id.to_string(),
        step_id: step_id.to_string(),
        status: parse_status(status),
        post_mood_id: None,
    }
}

// ===== Given Steps =====

#[given(expr = "the next status update fails with HTTP {int}")]
async fn next_update_fails(world: &mut TimelineWorld, status: u16) {
    world
        .service()
        .api()
        .fail_next_update(ApiError::http(status, "server said no"));
}

#[given(expr = "an update {string} sets step {string} of {string} to {string}")]
async fn update_in_flight(
    world: &mut TimelineWorld,
    label: String,
    step_id: String,
    progress_id: String,
    status: String,
) {
    world.hold(&label, set_status_command(&progress_id, &step_id, &status));
}

// ===== When Steps =====

#[when(expr = "the user advances step {string} of {string}")]
async fn advance_step(world: &mut TimelineWorld, step_id: String, progress_id: String) {
    let command = advance_command(world, &progress_id, &step_id);
    world.dispatch(command).await;
}

#[when(expr = "the user advances step {string} of {string} {int} times")]
async fn advance_step_times(
    world: &mut TimelineWorld,
    step_id: String,
    progress_id: String,
    times: usize,
) {
    for _ in 0..times {
        let command = advance_command(world, &progress_id, &step_id);
        world.dispatch(command).await;
    }
}

#[when(expr = "the user sets step {string} of {string} to {string}")]
async fn set_step_status(
    world: &mut TimelineWorld,
    step_id: String,
    progress_id: String,
    status: String,
) {
    world
        .dispatch(set_status_command(&progress_id, &step_id, &status))
        .await;
}

#[when(expr = "update {string} completes")]
async fn update_completes(world: &mut TimelineWorld, label: String) {
    world.release(&label).await;
}

// ===== Then Steps =====

#[then(expr = "step {string} of {string} is {string}")]
async fn step_has_status(
    world: &mut TimelineWorld,
    step_id: String,
    progress_id: String,
    expected: String,
) {
    assert_eq!(
        world.step_status(&progress_id, &step_id),
        parse_status(&expected)
    );
}

#[then(expr = "step {string} of {string} is updating")]
async fn step_is_updating(world: &mut TimelineWorld, step_id: String, progress_id: String) {
    let key = StepKey::new(progress_id, step_id);
    assert!(world.snapshot().is_updating(&key), "{} is not updating", key);
}

#[then(expr = "step {string} of {string} is not updating")]
async fn step_is_not_updating(world: &mut TimelineWorld, step_id: String, progress_id: String) {
    let key = StepKey::new(progress_id, step_id);
    assert!(!world.snapshot().is_updating(&key), "{} is still updating", key);
}

#[then("the command fails")]
async fn command_fails(world: &mut TimelineWorld) {
    assert!(
        world.last_command_failed(),
        "Expected a failed command, got {:?}",
        world.last_events
    );
}
