//! End-to-end runs of the built-in scenarios through the tokio driver.

use std::time::Duration;

use velocity_playback::{DriverConfig, PlaybackDriver, PlaybackPhase, ScenarioCatalog};
use velocity_test::{assert_percent, setup_test_logging_default, test_scenario};

#[tokio::test(start_paused = true)]
async fn builtin_scenarios_play_through_with_deferred_hand_over() {
    setup_test_logging_default();
    let catalog = ScenarioCatalog::builtin();

    for scenario in catalog.iter() {
        let handle = PlaybackDriver::spawn(scenario.clone(), DriverConfig::default());
        let mut updates = handle.subscribe();
        handle.start().await.unwrap();

        let finished = tokio::time::timeout(Duration::from_secs(600), async {
            loop {
                updates.changed().await.unwrap();
                let snap = updates.borrow_and_update().clone();
                if snap.is_complete() {
                    return snap;
                }
                if snap.can_advance() {
                    handle.advance().await.unwrap();
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(finished.scenario_id, scenario.id);
        assert!(finished.step_completed.iter().all(|c| *c));
        assert!(!finished.is_playing);
        assert_percent(finished.overall_progress_percent, 100.0);
        handle.shutdown().await;
    }
}

#[tokio::test(start_paused = true)]
async fn commands_after_reset_see_a_clean_state() {
    let scenario = test_scenario("clean", &[(3, true), (2, false)]);
    let handle = PlaybackDriver::spawn(scenario, DriverConfig::default());

    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(3_200)).await;
    assert_eq!(handle.snapshot().phase, PlaybackPhase::AutoAdvancePending);

    let reset = handle.reset().await.unwrap();
    assert_eq!(reset.phase, PlaybackPhase::NotStarted);

    // The delay armed before the reset must never land.
    tokio::time::sleep(Duration::from_secs(5)).await;
    let snap = handle.snapshot();
    assert_eq!(snap, reset);
    assert_eq!(snap.elapsed_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn selecting_from_the_catalog_switches_the_driver() {
    let catalog = ScenarioCatalog::builtin();
    let first = catalog.first().unwrap();
    let handle = PlaybackDriver::spawn(first, DriverConfig::default());
    handle.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_100)).await;

    let next = catalog.require("audit-readiness").unwrap();
    let snap = handle.select(next.clone()).await.unwrap();
    assert_eq!(snap.scenario_id, "audit-readiness");
    assert_eq!(snap.step_completed.len(), next.len());
    assert_eq!(snap.current_step_index, None);
    assert!(!snap.is_playing);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(handle.snapshot().elapsed_seconds, 0);
}
