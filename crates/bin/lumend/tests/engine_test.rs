//! End-to-end tests wiring the in-memory store, virtual lights, tracker,
//! scheduler, and conflict analyzer together the way `main` does.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use lumen_adapter_memory::{InMemorySceneRepository, InMemoryScheduleRepository};
use lumen_adapter_virtual::VirtualLightBus;
use lumen_app::conflict::ConflictAnalyzer;
use lumen_app::event_bus::InProcessEventBus;
use lumen_app::ports::ScheduleRepository;
use lumen_app::ports::reasoning::NoReasoning;
use lumen_app::scheduler::Scheduler;
use lumen_app::tracker::CommandTracker;
use lumen_domain::event::EventType;
use lumen_domain::scene::{Scene, SceneSettings};
use lumen_domain::schedule::{LightIntent, LightParams, Schedule, ScheduleAction, Trigger};
use lumen_domain::time::Timestamp;

type Engine = Scheduler<
    Arc<InMemoryScheduleRepository>,
    Arc<InMemorySceneRepository>,
    Arc<VirtualLightBus<Arc<InProcessEventBus>>>,
    Arc<InProcessEventBus>,
>;

struct Harness {
    bus: Arc<InProcessEventBus>,
    tracker: Arc<CommandTracker<Arc<InProcessEventBus>>>,
    schedules: Arc<InMemoryScheduleRepository>,
    scenes: Arc<InMemorySceneRepository>,
    lights: Arc<VirtualLightBus<Arc<InProcessEventBus>>>,
    scheduler: Engine,
}

fn harness(silent_targets: Vec<usize>) -> Harness {
    let bus = Arc::new(InProcessEventBus::new(64));
    let tracker = Arc::new(CommandTracker::new(Arc::clone(&bus)));
    let schedules = Arc::new(InMemoryScheduleRepository::new());
    let scenes = Arc::new(InMemorySceneRepository::new());
    let lights = Arc::new(
        VirtualLightBus::new(Arc::clone(&tracker))
            .with_ack_delay(Duration::from_millis(50))
            .with_silent_targets(silent_targets),
    );
    let scheduler = Scheduler::new(
        Arc::clone(&schedules),
        Arc::clone(&scenes),
        Arc::clone(&lights),
        Arc::clone(&tracker),
        Arc::clone(&bus),
    );
    Harness {
        bus,
        tracker,
        schedules,
        scenes,
        lights,
        scheduler,
    }
}

/// 2026-03-02 is a Monday.
fn monday_at(hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, 0).unwrap()
}

fn light_schedule(name: &str, at: &str, target: &str, intent: LightIntent) -> Schedule {
    Schedule::builder()
        .name(name)
        .trigger(Trigger::at(at))
        .action(ScheduleAction::Light {
            intent,
            target: Some(target.to_string()),
            params: LightParams::default(),
        })
        .build()
        .unwrap()
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<lumen_domain::event::Event>) -> Vec<EventType> {
    let mut types = Vec::new();
    while let Ok(event) = rx.try_recv() {
        types.push(event.event_type);
    }
    types
}

#[tokio::test(start_paused = true)]
async fn should_fire_schedule_and_confirm_all_acknowledgments() {
    let harness = harness(vec![]);
    let mut rx = harness.bus.subscribe();

    let schedule = light_schedule("Morning all on", "07:00", "all", LightIntent::On);
    let id = schedule.id;
    harness.schedules.create(schedule).await.unwrap();

    let fired = harness.scheduler.tick(monday_at(7, 0)).await.unwrap();
    assert_eq!(fired, vec![id]);

    // Let the simulated lights acknowledge.
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(harness.tracker.pending_count(), 0);
    for index in 0..5 {
        assert!(harness.lights.light(index).unwrap().on);
    }

    let events = drain(&mut rx);
    assert_eq!(
        events
            .iter()
            .filter(|t| **t == EventType::CommandPending)
            .count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|t| **t == EventType::CommandConfirmed)
            .count(),
        1
    );
    assert_eq!(
        events
            .iter()
            .filter(|t| **t == EventType::ScheduleTriggered)
            .count(),
        1
    );
    assert!(!events.contains(&EventType::CommandTimeout));

    let stored = harness.schedules.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.trigger_count, 1);
    assert!(stored.last_triggered_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn should_time_out_when_a_target_never_acknowledges() {
    let harness = harness(vec![3]);
    let mut rx = harness.bus.subscribe();

    let schedule = light_schedule("Evening all off", "22:00", "all", LightIntent::Off);
    harness.schedules.create(schedule).await.unwrap();

    let now = monday_at(22, 0);
    harness.scheduler.tick(now).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Four of five targets acked; the fan-out is still pending.
    assert_eq!(harness.tracker.pending_count(), 1);

    harness
        .tracker
        .sweep_at(now + chrono::Duration::seconds(11))
        .await;
    assert_eq!(harness.tracker.pending_count(), 0);

    let events = drain(&mut rx);
    assert_eq!(
        events
            .iter()
            .filter(|t| **t == EventType::CommandTimeout)
            .count(),
        1
    );
    assert!(!events.contains(&EventType::CommandConfirmed));
}

#[tokio::test(start_paused = true)]
async fn should_apply_scene_through_the_whole_pipeline() {
    let harness = harness(vec![]);

    harness.scenes.upsert(Scene::new(
        "Relax",
        SceneSettings {
            brightness: Some(30),
            color_temp: Some(2700),
            target: Some("living_room".to_string()),
            ..SceneSettings::default()
        },
    ));

    let schedule = Schedule::builder()
        .name("Evening wind-down")
        .trigger(Trigger::at("21:30"))
        .action(ScheduleAction::Scene {
            scene: "relax".to_string(),
            target: None,
        })
        .build()
        .unwrap();
    harness.schedules.create(schedule).await.unwrap();

    harness.scheduler.tick(monday_at(21, 30)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // living_room maps to target index 4; other lights stay untouched.
    let light = harness.lights.light(4).unwrap();
    assert!(light.on);
    assert_eq!(light.brightness, Some(30));
    assert_eq!(light.color_temp, Some(2700));
    assert!(!harness.lights.light(0).unwrap().on);
    assert_eq!(harness.tracker.pending_count(), 0);
}

#[tokio::test]
async fn should_detect_and_resolve_conflicts_against_the_store() {
    let harness = harness(vec![]);
    let analyzer = ConflictAnalyzer::new(Arc::clone(&harness.schedules), NoReasoning);

    let existing = light_schedule("Morning on", "07:00", "all", LightIntent::On);
    harness.schedules.create(existing).await.unwrap();

    let candidate = light_schedule("Morning off", "07:05", "kitchen", LightIntent::Off);
    let analysis = analyzer.detect_conflicts(&candidate).await.unwrap();
    assert!(analysis.has_conflicts);
    assert_eq!(analysis.conflicts.len(), 1);

    // Apply the "keep existing" option: it disables the candidate.
    let candidate = harness.schedules.create(candidate).await.unwrap();
    let disable = analysis.conflicts[0]
        .resolutions
        .iter()
        .find(|r| r.id == "prioritize_existing")
        .unwrap();
    let message = analyzer
        .apply_resolution(candidate.id, "prioritize_existing", &disable.changes)
        .await
        .unwrap();
    assert_eq!(message, "Schedule 'Morning off' has been disabled");

    // A disabled schedule no longer fires.
    let fired = harness.scheduler.tick(monday_at(7, 5)).await.unwrap();
    assert!(fired.is_empty());
}
