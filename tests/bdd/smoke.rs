//! Suite-level sanity: the smallest feature, through the invocation layer.

mod steps;

use gauntlet_runner::ScenarioRun;
use steps::world::AuthWorld;

#[tokio::test]
async fn smoke_feature_runs_green() {
    let outcome = ScenarioRun::from_resource("features/smoke.feature")
        .relative_to(env!("CARGO_MANIFEST_DIR"))
        .execute::<AuthWorld>()
        .await
        .expect("smoke feature should resolve");

    assert!(!outcome.has_failures(), "smoke scenario failed: {outcome:?}");
    assert_eq!(outcome.passed_steps, 2);
    assert_eq!(outcome.report, None);
}
