//! Schedule — a time/event-based automation rule.
//!
//! Schedules fire lighting actions without manual intervention. Each has a
//! [`Trigger`] that determines when it activates and one or more
//! [`ScheduleAction`]s to execute in order.

mod action;
mod trigger;

pub use action::{LightIntent, LightParams, ScheduleAction};
pub use trigger::Trigger;

use serde::{Deserialize, Serialize};

use crate::error::{LumenError, ValidationError};
use crate::id::ScheduleId;
use crate::time::Timestamp;

/// An automation rule that fires lighting actions on a trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    pub enabled: bool,
    pub trigger: Trigger,
    pub actions: Vec<ScheduleAction>,
    /// Set by the scheduler after each successful fire. Monotonically
    /// non-decreasing; never touched by anything else.
    pub last_triggered_at: Option<Timestamp>,
    /// Incremented by exactly one per firing, regardless of action count.
    pub trigger_count: u32,
}

impl Schedule {
    /// Create a builder for constructing a [`Schedule`].
    #[must_use]
    pub fn builder() -> ScheduleBuilder {
        ScheduleBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Validation`] when:
    /// - `name` is empty ([`ValidationError::EmptyName`])
    /// - `actions` is empty ([`ValidationError::NoActions`])
    pub fn validate(&self) -> Result<(), LumenError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        Ok(())
    }

    /// The intent of the first action, used for conflict classification.
    #[must_use]
    pub fn primary_intent(&self) -> PrimaryIntent {
        match self.actions.first() {
            Some(ScheduleAction::Light { intent, .. }) => PrimaryIntent::Light(*intent),
            Some(ScheduleAction::Scene { .. }) => PrimaryIntent::Scene,
            None => PrimaryIntent::Unknown,
        }
    }

    /// The target of the first action, defaulting to `"all"`.
    #[must_use]
    pub fn primary_target(&self) -> &str {
        self.actions.first().map_or("all", ScheduleAction::target)
    }
}

/// The first action's intent, derived for pairwise conflict classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryIntent {
    Light(LightIntent),
    Scene,
    Unknown,
}

impl std::fmt::Display for PrimaryIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light(intent) => intent.fmt(f),
            Self::Scene => f.write_str("scene.apply"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Step-by-step builder for [`Schedule`].
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    id: Option<ScheduleId>,
    name: Option<String>,
    enabled: Option<bool>,
    trigger: Option<Trigger>,
    actions: Vec<ScheduleAction>,
    last_triggered_at: Option<Timestamp>,
    trigger_count: u32,
}

impl ScheduleBuilder {
    #[must_use]
    pub fn id(mut self, id: ScheduleId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn action(mut self, action: ScheduleAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Consume the builder, validate, and return a [`Schedule`].
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Validation`] if required fields are missing or empty.
    pub fn build(self) -> Result<Schedule, LumenError> {
        let schedule = Schedule {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            trigger: self.trigger.unwrap_or_else(|| Trigger::at("00:00")),
            actions: self.actions,
            last_triggered_at: self.last_triggered_at,
            trigger_count: self.trigger_count,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_on_action() -> ScheduleAction {
        ScheduleAction::Light {
            intent: LightIntent::On,
            target: Some("kitchen".to_string()),
            params: LightParams::default(),
        }
    }

    fn valid_schedule() -> Schedule {
        Schedule::builder()
            .name("Morning lights")
            .trigger(Trigger::at_on("07:00", &["mon", "tue", "wed", "thu", "fri"]))
            .action(light_on_action())
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_valid_schedule_when_required_fields_provided() {
        let schedule = valid_schedule();
        assert_eq!(schedule.name, "Morning lights");
        assert!(schedule.enabled);
        assert_eq!(schedule.actions.len(), 1);
        assert!(schedule.last_triggered_at.is_none());
        assert_eq!(schedule.trigger_count, 0);
    }

    #[test]
    fn should_default_to_enabled_when_not_specified() {
        assert!(valid_schedule().enabled);
    }

    #[test]
    fn should_build_disabled_schedule_when_enabled_is_false() {
        let schedule = Schedule::builder()
            .name("Disabled rule")
            .enabled(false)
            .action(light_on_action())
            .build()
            .unwrap();
        assert!(!schedule.enabled);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Schedule::builder().action(light_on_action()).build();
        assert!(matches!(
            result,
            Err(LumenError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_actions_is_empty() {
        let result = Schedule::builder().name("No actions").build();
        assert!(matches!(
            result,
            Err(LumenError::Validation(ValidationError::NoActions))
        ));
    }

    #[test]
    fn should_derive_light_primary_intent_from_first_action() {
        let schedule = valid_schedule();
        assert_eq!(
            schedule.primary_intent(),
            PrimaryIntent::Light(LightIntent::On)
        );
        assert_eq!(schedule.primary_intent().to_string(), "light.on");
    }

    #[test]
    fn should_derive_scene_primary_intent_from_scene_action() {
        let schedule = Schedule::builder()
            .name("Movie night")
            .trigger(Trigger::at("20:30"))
            .action(ScheduleAction::Scene {
                scene: "Movie".to_string(),
                target: None,
            })
            .build()
            .unwrap();
        assert_eq!(schedule.primary_intent(), PrimaryIntent::Scene);
        assert_eq!(schedule.primary_intent().to_string(), "scene.apply");
    }

    #[test]
    fn should_derive_primary_target_from_first_action() {
        assert_eq!(valid_schedule().primary_target(), "kitchen");
    }

    #[test]
    fn should_set_custom_id_via_builder() {
        let id = ScheduleId::new();
        let schedule = Schedule::builder()
            .id(id)
            .name("Custom ID")
            .action(light_on_action())
            .build()
            .unwrap();
        assert_eq!(schedule.id, id);
    }

    #[test]
    fn should_roundtrip_schedule_through_serde_json() {
        let schedule = valid_schedule();
        let json = serde_json::to_string(&schedule).unwrap();
        let parsed: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, schedule.id);
        assert_eq!(parsed.name, schedule.name);
        assert_eq!(parsed.trigger, schedule.trigger);
        assert_eq!(parsed.actions, schedule.actions);
    }
}
