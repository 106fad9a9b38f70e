use std::path::Path;

use maze_core::{
    AbilityId, AbilitySave, EnemyTier, Facing, Position, SimEvent, TickReport,
};
use maze_runtime::{
    Event, InputFrame, Runtime, RuntimeError, ScriptedInput, Topic, WorkerEvent,
};
use tokio::sync::broadcast;

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn count(reports: &[TickReport], name: &str) -> usize {
    reports.iter().map(|report| report.count(name)).sum()
}

#[tokio::test]
async fn melee_kill_is_published_on_the_combat_topic() {
    let runtime = Runtime::builder()
        .spawn(EnemyTier::E02, Position::new(1, 0))
        .build()
        .await
        .expect("runtime should start");
    let handle = runtime.handle();
    let mut combat = handle.subscribe(Topic::Combat);

    handle
        .set_pose(Position::ORIGIN, Facing::Right)
        .await
        .expect("pose");
    handle.activate_slot(0).await.expect("activation queued");
    let reports = handle.step(10).await.expect("step");
    assert!(reports.iter().all(|report| report.rejected.is_empty()));

    let events = drain(&mut combat);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Simulation(SimEvent::AttackHit { damage: 5, .. })
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Simulation(SimEvent::EnemyDeath { tier: EnemyTier::E02, .. })
    )));

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert!(snapshot.enemies.is_empty());
    assert_eq!(snapshot.tick.0, 10);

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn scripted_input_aims_and_commits_an_area_cast() {
    let mut frames = vec![InputFrame::press(2).with_aim(Position::new(3, 3))];
    frames.extend(std::iter::repeat_n(InputFrame::idle(), 15));
    frames.push(InputFrame::press(2));
    let script = ScriptedInput::new(frames);

    let mut runtime = Runtime::builder()
        .player_start(Position::new(3, 1))
        .input_provider(script)
        .build()
        .await
        .expect("runtime should start");

    let reports = runtime.run_ticks(20).await.expect("scripted run");
    assert_eq!(reports.len(), 20);
    assert_eq!(count(&reports, "ability_activated"), 2);
    let resolved = reports
        .iter()
        .flat_map(|report| &report.events)
        .find(|event| matches!(event, SimEvent::AoeResolved { .. }));
    assert_eq!(
        resolved,
        Some(&SimEvent::AoeResolved {
            center: Position::new(3, 3),
            radius: 2,
            targets_hit: 0,
        })
    );

    let snapshot = runtime.handle().snapshot().await.expect("snapshot");
    assert_eq!(snapshot.player.mana, 80);
}

#[tokio::test]
async fn rejected_activation_does_not_stop_the_worker() {
    let runtime = Runtime::builder().build().await.expect("runtime should start");
    let handle = runtime.handle();

    handle.activate_slot(9).await.expect("queued");
    handle.activate_slot(1).await.expect("queued");
    let reports = handle.step(1).await.expect("step");
    assert_eq!(reports[0].rejected.len(), 1);
    assert_eq!(reports[0].count("dash_started"), 1);

    let reports = handle.step(1).await.expect("worker still serving");
    assert_eq!(reports.len(), 1);
}

#[tokio::test]
async fn ability_records_round_trip_through_json() {
    let runtime = Runtime::builder().build().await.expect("runtime should start");
    let handle = runtime.handle();
    assert!(handle.upgrade_ability(AbilityId::Dash).await.expect("upgrade"));
    assert!(handle.upgrade_ability(AbilityId::Dash).await.expect("upgrade"));
    handle.activate_slot(1).await.expect("queued");
    handle.step(3).await.expect("step");

    let records = handle.save_abilities().await.expect("save");
    let json = serde_json::to_string(&records).expect("records serialize");
    let decoded: Vec<AbilitySave> = serde_json::from_str(&json).expect("records deserialize");
    assert_eq!(decoded, records);

    let fresh = Runtime::builder().build().await.expect("second runtime");
    let fresh_handle = fresh.handle();
    let mut worker = fresh_handle.subscribe(Topic::Worker);
    assert_eq!(fresh_handle.restore_abilities(decoded).await.expect("restore"), 3);
    assert!(drain(&mut worker).contains(&Event::Worker(WorkerEvent::AbilitiesRestored {
        applied: 3,
        offered: 3,
    })));

    let snapshot = fresh_handle.snapshot().await.expect("snapshot");
    let dash = snapshot
        .player
        .abilities
        .iter()
        .find(|view| view.id == AbilityId::Dash)
        .expect("dash view");
    assert_eq!(dash.level, 3);
    assert!(dash.active);
}

#[tokio::test]
async fn stepping_reports_on_the_worker_topic() {
    let runtime = Runtime::builder().build().await.expect("runtime should start");
    let handle = runtime.handle();
    let mut worker = handle.subscribe(Topic::Worker);

    handle.step(4).await.expect("step");
    let events = drain(&mut worker);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Worker(WorkerEvent::Stepped { ticks: 4, rejected: 0, .. })
    )));
}

#[test]
fn missing_content_directory_is_a_content_error() {
    let err = Runtime::builder()
        .load_content(Path::new("/nonexistent/maze-data"), "arena")
        .err()
        .expect("load should fail");
    assert!(matches!(err, RuntimeError::Content { ref maze, .. } if maze == "arena"));
}

#[tokio::test]
async fn shipped_arena_boots_with_its_roster() {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../game/content/data");
    let runtime = Runtime::builder()
        .load_content(&data_dir, "arena")
        .expect("arena content")
        .build()
        .await
        .expect("runtime should start");

    let snapshot = runtime.handle().snapshot().await.expect("snapshot");
    assert_eq!(snapshot.player.position, Position::new(2, 5));
    assert_eq!(snapshot.enemies.len(), 4);
}
