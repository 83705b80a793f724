//! Integration tests replaying the shipped scenario files.

use std::path::PathBuf;
use std::sync::Arc;

use touchmap_core::{PointerManager, TouchAction, TouchPoint};
use touchmap_engine::application::emitter::TouchSink;
use touchmap_engine::application::engine::InputToTouchEngine;
use touchmap_engine::application::observation_task::TickDriver;
use touchmap_engine::infrastructure::scenario::Scenario;
use touchmap_engine::infrastructure::storage::config::EngineConfig;
use touchmap_engine::infrastructure::touch_sink::RecordingTouchSink;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

fn engine_for(scenario: &Scenario) -> (InputToTouchEngine, Arc<RecordingTouchSink>) {
    let sink = Arc::new(RecordingTouchSink::new());
    let engine = InputToTouchEngine::new(
        Arc::new(scenario.build_provider().unwrap()),
        Arc::clone(&sink) as Arc<dyn TouchSink>,
        Arc::new(PointerManager::new()),
        TickDriver::current(),
        scenario.settings(&EngineConfig::default()).unwrap(),
    );
    (engine, sink)
}

#[tokio::test(start_paused = true)]
async fn test_dpad_walk_moves_up_then_up_left_and_lifts() {
    // Arrange
    let scenario = Scenario::load(&scenario_path("dpad_walk.toml")).unwrap();
    let (engine, sink) = engine_for(&scenario);

    // Act
    let report = scenario.replay(&engine).await.unwrap();

    // Assert
    assert_eq!(report.discarded, 0);
    let emitted = sink.entities();
    let walk: Vec<_> = emitted.iter().filter(|e| e.pointer_id == emitted[0].pointer_id).collect();
    assert_eq!(walk[0].action, TouchAction::Down);
    assert_eq!(walk[0].point(), TouchPoint::new(400, 800));
    assert_eq!(walk.last().map(|e| e.action), Some(TouchAction::Up));
    assert_eq!(walk.last().map(|e| e.action_time), Some(450_000));
    assert!(
        walk.windows(2).all(|w| w[0].action_time <= w[1].action_time),
        "walk pointer went back in time"
    );

    let moves: Vec<_> = walk.iter().filter(|e| e.action == TouchAction::Move).collect();
    assert!(moves.len() >= 8, "expected a tick roughly every 50 ms, got {}", moves.len());
    assert!(moves.windows(2).all(|w| w[1].y < w[0].y), "every tick moves up");
    assert!(moves.last().map_or(false, |m| m.x < 400), "the left leg moves left");

    let space: Vec<_> = emitted.iter().filter(|e| e.point() == TouchPoint::new(2100, 900)).collect();
    assert_eq!(space.len(), 2);
    assert!(engine.context().lock().is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_aim_and_fire_replays_every_gesture() {
    // Arrange
    let scenario = Scenario::load(&scenario_path("aim_and_fire.toml")).unwrap();
    let (engine, sink) = engine_for(&scenario);

    // Act
    let report = scenario.replay(&engine).await.unwrap();

    // Assert: the modifier's own down and up are discarded as unmapped
    assert_eq!((report.handled, report.discarded), (8, 2));
    let emitted = sink.entities();
    let summary: Vec<_> = emitted.iter().map(|e| (e.action, e.x, e.y)).collect();
    assert_eq!(
        summary,
        vec![
            (TouchAction::Down, 1800, 400),
            (TouchAction::Move, 1830, 392),
            (TouchAction::Move, 1824, 404),
            (TouchAction::Up, 1824, 404),
            (TouchAction::Down, 2000, 700),
            (TouchAction::Up, 2000, 700),
            (TouchAction::Down, 1900, 950),
            (TouchAction::Up, 1900, 950),
        ]
    );
    assert_eq!(emitted[4].pointer_id, engine.fire_pointer_id());
    assert_eq!(engine.reset(report.elapsed_us), 0);
}
