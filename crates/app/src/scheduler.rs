//! Per-minute schedule evaluation and execution.
//!
//! The scheduler wakes once a minute, evaluates every enabled time schedule
//! against the current local time, and fires the matching ones. A minute key
//! guards against double evaluation when ticks land twice inside the same
//! minute. A tick never crashes the loop: per-schedule and per-action
//! failures are logged and the remaining work proceeds.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Timelike;

use lumen_domain::command::LightCommand;
use lumen_domain::error::{LumenError, NotFoundError};
use lumen_domain::event::{Event, EventType};
use lumen_domain::id::{SceneId, ScheduleId};
use lumen_domain::scene::Scene;
use lumen_domain::schedule::{Schedule, ScheduleAction, Trigger};
use lumen_domain::time::{self, Timestamp};

use crate::ports::{CommandPublisher, EventPublisher, SceneRepository, ScheduleRepository};
use crate::rooms;
use crate::tracker::CommandTracker;

/// Evaluates enabled time schedules and executes the ones that are due.
pub struct Scheduler<SR, SC, C, B> {
    schedules: SR,
    scenes: SC,
    commands: C,
    tracker: Arc<CommandTracker<B>>,
    events: B,
    last_processed_minute: Mutex<Option<String>>,
}

impl<SR, SC, C, B> Scheduler<SR, SC, C, B>
where
    SR: ScheduleRepository,
    SC: SceneRepository,
    C: CommandPublisher,
    B: EventPublisher,
{
    pub fn new(
        schedules: SR,
        scenes: SC,
        commands: C,
        tracker: Arc<CommandTracker<B>>,
        events: B,
    ) -> Self {
        Self {
            schedules,
            scenes,
            commands,
            tracker,
            events,
            last_processed_minute: Mutex::new(None),
        }
    }

    /// Evaluate all enabled time schedules at `now` and fire the due ones.
    ///
    /// Returns the ids of the schedules that fired. A second call inside the
    /// same wall-clock minute is a no-op, so callers may tick more often than
    /// once a minute without double firing.
    ///
    /// # Errors
    ///
    /// Fails only when the schedule listing itself cannot be read. Failures
    /// of individual schedules or actions are logged and skipped.
    pub async fn tick(&self, now: Timestamp) -> Result<Vec<ScheduleId>, LumenError> {
        let minute_key = now.format("%H:%M").to_string();
        {
            let mut last = self
                .last_processed_minute
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if last.as_deref() == Some(minute_key.as_str()) {
                tracing::debug!(minute = %minute_key, "minute already processed, skipping tick");
                return Ok(Vec::new());
            }
            *last = Some(minute_key);
        }

        let schedules = self.schedules.get_enabled_time().await?;
        let mut fired = Vec::new();

        for schedule in schedules {
            if !should_trigger(&schedule, now) {
                continue;
            }
            tracing::info!(
                schedule_id = %schedule.id,
                name = %schedule.name,
                "schedule due, executing",
            );
            match self.execute_schedule(schedule, now).await {
                Ok(id) => fired.push(id),
                Err(err) => tracing::error!(error = %err, "schedule execution failed"),
            }
        }

        Ok(fired)
    }

    /// Run every action of a due schedule, then record the firing once.
    ///
    /// Action failures are logged individually and do not abort the rest;
    /// statistics are updated per firing regardless.
    async fn execute_schedule(
        &self,
        schedule: Schedule,
        now: Timestamp,
    ) -> Result<ScheduleId, LumenError> {
        for action in &schedule.actions {
            if let Err(err) = self.execute_action(action, now).await {
                tracing::error!(
                    schedule_id = %schedule.id,
                    action = %action_kind(action),
                    error = %err,
                    "schedule action failed",
                );
            }
        }
        self.record_firing(schedule, now).await
    }

    async fn execute_action(
        &self,
        action: &ScheduleAction,
        now: Timestamp,
    ) -> Result<(), LumenError> {
        match action {
            ScheduleAction::Light {
                intent,
                target,
                params,
            } => {
                let indices = rooms::indices_for(target.as_deref());
                let label = format!("Schedule: {intent}");
                let correlation_id = self
                    .tracker
                    .register_at(None, &label, indices.len(), now)
                    .await;
                let command =
                    LightCommand::for_intent(*intent, params).with_correlation(correlation_id);
                self.fan_out(&indices, &command).await;
                Ok(())
            }
            ScheduleAction::Scene { scene, target } => {
                let resolved = self.resolve_scene(scene).await?;
                // Precedence: action target, then the scene's own target.
                let effective_target = target
                    .as_deref()
                    .or(resolved.settings.target.as_deref());
                let indices = rooms::indices_for(effective_target);
                let label = format!("Schedule: {}", resolved.name);
                let correlation_id = self
                    .tracker
                    .register_at(Some(resolved.id), &label, indices.len(), now)
                    .await;
                let command =
                    LightCommand::for_scene(&resolved.settings).with_correlation(correlation_id);
                self.fan_out(&indices, &command).await;
                Ok(())
            }
        }
    }

    /// Publish one command to every target index, logging per-index failures.
    ///
    /// A target that never received its command simply never acks; the
    /// tracker's timeout reports the shortfall.
    async fn fan_out(&self, indices: &[usize], command: &LightCommand) {
        for &index in indices {
            if let Err(err) = self.commands.publish(index, command.clone()).await {
                tracing::warn!(index, error = %err, "command publish failed");
            }
        }
    }

    /// Look up a scene reference: a UUID string first, then a
    /// case-insensitive active-scene name.
    async fn resolve_scene(&self, reference: &str) -> Result<Scene, LumenError> {
        if let Ok(id) = reference.parse::<SceneId>() {
            if let Some(scene) = self.scenes.get_by_id(id).await? {
                return Ok(scene);
            }
        }
        match self.scenes.find_by_name(reference).await? {
            Some(scene) => Ok(scene),
            None => Err(NotFoundError::new("scene", reference).into()),
        }
    }

    async fn record_firing(
        &self,
        mut schedule: Schedule,
        now: Timestamp,
    ) -> Result<ScheduleId, LumenError> {
        schedule.last_triggered_at = Some(now);
        schedule.trigger_count += 1;
        let updated = self.schedules.update(schedule).await?;

        if let Err(err) = self
            .events
            .publish(Event::new(
                EventType::ScheduleTriggered,
                serde_json::json!({
                    "schedule_id": updated.id,
                    "schedule_name": updated.name,
                    "trigger_count": updated.trigger_count,
                }),
            ))
            .await
        {
            tracing::warn!(error = %err, "failed to publish schedule trigger event");
        }

        Ok(updated.id)
    }
}

/// Whether `schedule` is due at `now`.
///
/// Only time triggers fire. The trigger matches when its parsed time equals
/// `now` to the minute and, if a weekday restriction exists, today is in it.
/// Absent or empty restrictions mean every day; an unparsable time never
/// matches.
#[must_use]
pub fn should_trigger(schedule: &Schedule, now: Timestamp) -> bool {
    let Trigger::Time { at, weekdays } = &schedule.trigger else {
        return false;
    };
    let Some(at) = time::parse_at(at) else {
        return false;
    };
    if at.hour() != now.hour() || at.minute() != now.minute() {
        return false;
    }
    match weekdays {
        None => true,
        Some(days) if days.is_empty() => true,
        Some(days) => {
            let today = time::weekday_code(chrono::Datelike::weekday(&now));
            days.iter().any(|day| time::normalize_day(day) == today)
        }
    }
}

fn action_kind(action: &ScheduleAction) -> &'static str {
    match action {
        ScheduleAction::Light { .. } => "light",
        ScheduleAction::Scene { .. } => "scene",
    }
}
