use cucumber::{given, then};
use wellpath_tests::TimelineWorld;

#[given(expr = "the page was opened with challenge {string}")]
async fn opened_with_challenge(world: &mut TimelineWorld, progress_id: String) {
    assert!(
        world.service.is_none(),
        "Deep link must be set before the timeline starts"
    );
    world.deep_link = Some(progress_id);
}

#[then(expr = "challenge {string} is expanded")]
async fn challenge_expanded(world: &mut TimelineWorld, progress_id: String) {
    assert!(world
        .snapshot()
        .expansion
        .is_challenge_expanded(&progress_id));
}

#[then(expr = "challenge {string} is collapsed")]
async fn challenge_collapsed(world: &mut TimelineWorld, progress_id: String) {
    assert!(!world
        .snapshot()
        .expansion
        .is_challenge_expanded(&progress_id));
}

#[then("no challenge is expanded")]
async fn nothing_expanded(world: &mut TimelineWorld) {
    let snapshot = world.snapshot();
    assert_eq!(snapshot.expansion.expanded_challenges().count(), 0);
    assert_eq!(snapshot.scroll_request(), None);
}

#[then(expr = "the screen scrolls to challenge {string}")]
async fn scrolls_to(world: &mut TimelineWorld, progress_id: String) {
    assert_eq!(world.snapshot().scroll_request(), Some(progress_id.as_str()));
}
