use cucumber::{then, when};
use wellpath_core::TimelineCommand;
use wellpath_tests::{parse_challenge_type, parse_date, parse_process_status, TimelineWorld};

// ===== When Steps =====

#[when(expr = "the user filters by status {string}")]
async fn filter_by_status(world: &mut TimelineWorld, status: String) {
    let status = parse_process_status(&status);
    world
        .dispatch(TimelineCommand::SetProcessStatusFilter(Some(status)))
        .await;
}

#[when(expr = "the user filters by type {string}")]
async fn filter_by_type(world: &mut TimelineWorld, challenge_type: String) {
    let challenge_type = parse_challenge_type(&challenge_type);
    world
        .dispatch(TimelineCommand::SetChallengeTypeFilter(Some(challenge_type)))
        .await;
}

#[when(expr = "the user selects the date {string}")]
async fn select_date(world: &mut TimelineWorld, date: String) {
    let date = parse_date(&date);
    world.dispatch(TimelineCommand::SelectDate(Some(date))).await;
}

#[when("the user switches to the by-date view")]
async fn switch_to_by_date(world: &mut TimelineWorld) {
    world
        .dispatch(TimelineCommand::SetShowByChallenge(false))
        .await;
}

#[when("the user switches to the by-challenge view")]
async fn switch_to_by_challenge(world: &mut TimelineWorld) {
    world.dispatch(TimelineCommand::SetShowByChallenge(true)).await;
}

#[when("the user clears the filters")]
async fn clear_filters(world: &mut TimelineWorld) {
    world.dispatch(TimelineCommand::ClearFilters).await;
}

// ===== Then Steps =====

#[then("no status filter is set")]
async fn no_status_filter(world: &mut TimelineWorld) {
    assert_eq!(world.snapshot().filters.process_status(), None);
}

#[then("no filters are set")]
async fn no_filters(world: &mut TimelineWorld) {
    let snapshot = world.snapshot();
    assert!(snapshot.filters.is_empty(), "{:?}", snapshot.filters);
}

#[then("the view is by challenge")]
async fn view_is_by_challenge(world: &mut TimelineWorld) {
    assert!(world.snapshot().filters.show_by_challenge());
}

#[then(expr = "the by-date view shows only {string}")]
async fn by_date_shows_only(world: &mut TimelineWorld, date: String) {
    let snapshot = world.snapshot();
    let keys: Vec<String> = snapshot
        .by_date()
        .iter()
        .map(|group| group.key.clone())
        .collect();
    assert_eq!(keys, vec![date]);
}

#[then(expr = "the date {string} lists steps {string}")]
async fn date_lists_steps(world: &mut TimelineWorld, date: String, steps: String) {
    let snapshot = world.snapshot();
    let groups = snapshot.by_date();
    let group = groups
        .iter()
        .find(|group| group.key == date)
        .unwrap_or_else(|| panic!("No group for {}", date));

    let step_ids: Vec<&str> = group
        .entries
        .iter()
        .map(|entry| entry.step.step_id.as_str())
        .collect();
    assert_eq!(step_ids.join(", "), steps);
}
