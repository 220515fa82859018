use cucumber::{given, then, when};
use wellpath_core::domain::Challenge;
use wellpath_core::{ChallengeType, ImprovementTag};
use wellpath_tests::TimelineWorld;

// ===== Given Steps =====

#[given(expr = "the catalog offers challenge {string} named {string}")]
async fn catalog_offers(world: &mut TimelineWorld, challenge_id: String, name: String) {
    world.backend_challenges.push(Challenge {
        id: challenge_id,
        name,
        description: String::new(),
        media_url: None,
        challenge_type: ChallengeType::SevenDayChallenge,
        improvement_tag: Some(ImprovementTag::MentalHealth),
        total_steps: Some(7),
    });
}

// ===== When Steps =====

#[when(expr = "the user joins challenge {string}")]
async fn join_challenge(world: &mut TimelineWorld, challenge_id: String) {
    // Failures surface as notices
    let _ = world.service().register(challenge_id).await;
    world.collect_notices();
}

#[when("the user browses the catalog")]
async fn browse_catalog(world: &mut TimelineWorld) {
    let service = world.service();
    let query = service
        .catalog_query(None, None, 1)
        .expect("Default catalog query is valid");
    service
        .browse_catalog(query)
        .await
        .expect("Catalog request failed");
}

// ===== Then Steps =====

#[then(expr = "the catalog was fetched {int} time(s)")]
async fn catalog_fetch_count(world: &mut TimelineWorld, count: usize) {
    assert_eq!(world.service().api().catalog_fetches(), count);
}
