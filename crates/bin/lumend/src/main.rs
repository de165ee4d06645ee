//! # lumend — lumen daemon
//!
//! Composition root that wires all adapters together and runs the
//! automation loops.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Construct repository implementations (adapters)
//! - Construct the tracker, scheduler, and conflict analyzer, injecting
//!   collaborators via port traits
//! - Run the periodic tick and timeout-sweep loops
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use lumen_adapter_memory::{InMemorySceneRepository, InMemoryScheduleRepository};
use lumen_adapter_openai::OpenAiReasoning;
use lumen_adapter_virtual::VirtualLightBus;
use lumen_app::conflict::ConflictAnalyzer;
use lumen_app::event_bus::InProcessEventBus;
use lumen_app::ports::ReasoningService;
use lumen_app::scheduler::Scheduler;
use lumen_app::services::ScheduleService;
use lumen_app::tracker::CommandTracker;
use lumen_domain::error::LumenError;
use lumen_domain::scene::{Scene, SceneSettings};
use lumen_domain::schedule::{LightIntent, LightParams, Schedule, ScheduleAction, Trigger};
use lumen_domain::time;
use tracing_subscriber::EnvFilter;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Event bus and acknowledgment tracker
    let event_bus = Arc::new(InProcessEventBus::new(256));
    let timeout = i64::try_from(config.tracker.timeout_secs).unwrap_or(10);
    let tracker = Arc::new(CommandTracker::with_timeout(
        Arc::clone(&event_bus),
        chrono::Duration::seconds(timeout),
    ));

    // Repositories
    let schedules = Arc::new(InMemoryScheduleRepository::new());
    let scenes = Arc::new(InMemorySceneRepository::new());

    // Transport: simulated lights that acknowledge asynchronously
    let lights = Arc::new(
        VirtualLightBus::new(Arc::clone(&tracker))
            .with_ack_delay(Duration::from_millis(config.lights.ack_delay_ms))
            .with_silent_targets(config.lights.silent_targets.iter().copied()),
    );

    // Reasoning collaborator (optional)
    let reasoning = OpenAiReasoning::new(config.reasoning.api_key.clone())
        .with_model(&config.reasoning.model)
        .with_base_url(&config.reasoning.base_url);
    if reasoning.is_configured() {
        tracing::info!(model = %config.reasoning.model, "reasoning enhancement enabled");
    } else {
        tracing::info!("no API key configured, conflict analysis runs deterministically");
    }

    // Core components
    let scheduler = Scheduler::new(
        Arc::clone(&schedules),
        Arc::clone(&scenes),
        Arc::clone(&lights),
        Arc::clone(&tracker),
        Arc::clone(&event_bus),
    );
    let analyzer = ConflictAnalyzer::new(Arc::clone(&schedules), reasoning);
    let schedule_service = ScheduleService::new(Arc::clone(&schedules), Arc::clone(&event_bus));

    // Log every lifecycle event passing over the bus
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(event_type = ?event.event_type, data = %event.data, "event");
        }
    });

    seed_demo_data(&schedule_service, &scenes, &analyzer).await?;

    // The tick dedupes by wall-clock minute, so running it more often than
    // once a minute never double-fires a schedule.
    let mut tick = tokio::time::interval(Duration::from_secs(15));
    let mut sweep = tokio::time::interval(Duration::from_secs(config.tracker.sweep_secs));

    tracing::info!("lumend running");
    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(err) = scheduler.tick(time::now()).await {
                    tracing::error!(error = %err, "scheduler tick failed");
                }
            }
            _ = sweep.tick() => tracker.sweep().await,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

/// Seed a scene and two schedules so a fresh daemon has something to run,
/// and demonstrate conflict analysis on the second schedule before storing.
async fn seed_demo_data<A>(
    schedule_service: &ScheduleService<Arc<InMemoryScheduleRepository>, Arc<InProcessEventBus>>,
    scenes: &InMemorySceneRepository,
    analyzer: &ConflictAnalyzer<Arc<InMemoryScheduleRepository>, A>,
) -> Result<(), LumenError>
where
    A: lumen_app::ports::ReasoningService,
{
    scenes.upsert(Scene::new(
        "Relax",
        SceneSettings {
            brightness: Some(30),
            color_temp: Some(2700),
            target: Some("living_room".to_string()),
            ..SceneSettings::default()
        },
    ));

    let wake_up = Schedule::builder()
        .name("Weekday wake-up")
        .trigger(Trigger::at_on("07:00", &["mon", "tue", "wed", "thu", "fri"]))
        .action(ScheduleAction::Light {
            intent: LightIntent::On,
            target: Some("bedroom".to_string()),
            params: LightParams::default(),
        })
        .build()?;
    schedule_service.create_schedule(wake_up).await?;

    let wind_down = Schedule::builder()
        .name("Evening wind-down")
        .trigger(Trigger::at("21:30"))
        .action(ScheduleAction::Scene {
            scene: "Relax".to_string(),
            target: None,
        })
        .build()?;

    let analysis = analyzer.detect_conflicts(&wind_down).await?;
    tracing::info!(
        has_conflicts = analysis.has_conflicts,
        summary = %analysis.summary,
        "conflict analysis for seeded schedule",
    );
    schedule_service.create_schedule(wind_down).await?;

    Ok(())
}
