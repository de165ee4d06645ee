//! Resolution options and descriptions for detected conflicts.

use lumen_domain::conflict::{ConflictResolution, ConflictType, ResolutionAction, ScheduleConflict};
use lumen_domain::schedule::{Schedule, Trigger};
use lumen_domain::time;

use crate::rooms;

use super::detector::{self, ConflictInfo};

/// Assemble the full conflict record for a detected pair: classification,
/// severity, description and the ranked resolution options.
#[must_use]
pub fn build_conflict(
    candidate: &Schedule,
    existing: &Schedule,
    info: &ConflictInfo,
) -> ScheduleConflict {
    let conflict_type = detector::classify(candidate, existing);
    let severity = detector::severity(conflict_type, info.minutes_diff);
    let description = describe(
        conflict_type,
        info.minutes_diff,
        &info.target_a,
        &info.target_b,
    );
    let resolutions = basic_resolutions(candidate, existing, info.minutes_diff);

    ScheduleConflict {
        schedule_id: candidate.id,
        schedule_name: candidate.name.clone(),
        other_id: existing.id,
        other_name: existing.name.clone(),
        conflict_type,
        description,
        severity,
        resolutions,
    }
}

/// The deterministic resolution options for a conflicting pair.
///
/// Option ids are long-standing API values; note that `prioritize_existing`
/// disables the *candidate* schedule even though its `changes` read as if
/// they favored the existing one. Kept as-is for caller compatibility.
#[must_use]
pub fn basic_resolutions(
    candidate: &Schedule,
    existing: &Schedule,
    minutes_diff: i64,
) -> Vec<ConflictResolution> {
    let mut resolutions = Vec::new();

    if minutes_diff < 15 {
        let mut changes = serde_json::Map::new();
        changes.insert(
            "schedule_id".to_string(),
            serde_json::json!(candidate.id),
        );
        changes.insert(
            "new_time".to_string(),
            serde_json::Value::String(shifted_time(candidate, 15)),
        );
        resolutions.push(ConflictResolution {
            id: "adjust_new".to_string(),
            description: format!(
                "Move '{}' 15 minutes later to avoid overlap",
                candidate.name
            ),
            action: ResolutionAction::AdjustTime,
            changes,
        });
    }

    let mut disable_changes = serde_json::Map::new();
    disable_changes.insert(
        "schedule_id".to_string(),
        serde_json::json!(candidate.id),
    );
    resolutions.push(ConflictResolution {
        id: "prioritize_existing".to_string(),
        description: format!(
            "Keep '{}' and disable the new schedule",
            existing.name
        ),
        action: ResolutionAction::Disable,
        changes: disable_changes,
    });

    let mut delete_changes = serde_json::Map::new();
    delete_changes.insert("schedule_id".to_string(), serde_json::json!(existing.id));
    resolutions.push(ConflictResolution {
        id: "replace_existing".to_string(),
        description: format!("Replace '{}' with the new schedule", existing.name),
        action: ResolutionAction::Delete,
        changes: delete_changes,
    });

    resolutions
}

/// Human-readable description of a conflict, templated per type.
#[must_use]
pub fn describe(
    conflict_type: ConflictType,
    minutes_diff: i64,
    target_a: &str,
    target_b: &str,
) -> String {
    let time_desc = if minutes_diff == 0 {
        "at the exact same time".to_string()
    } else {
        format!("{minutes_diff} minutes apart")
    };

    let target_desc = if rooms::normalize(target_a) == rooms::normalize(target_b) {
        format!("the {}", rooms::normalize(target_a).replace('_', " "))
    } else {
        "overlapping areas (including 'all' rooms)".to_string()
    };

    match conflict_type {
        ConflictType::Contradiction => format!(
            "These schedules will turn lights ON and OFF {time_desc} for {target_desc}. \
             This will cause flickering or unexpected behavior."
        ),
        ConflictType::Duplicate => format!(
            "Both schedules perform the same action {time_desc} for {target_desc}. \
             One may be redundant."
        ),
        ConflictType::SceneOverlap => format!(
            "Two different scenes will be applied {time_desc} to {target_desc}. \
             The second scene will immediately override the first."
        ),
        ConflictType::BrightnessConflict => format!(
            "Different brightness levels will be set {time_desc} for {target_desc}. \
             This may cause visible flickering."
        ),
        ConflictType::TimingOverlap => format!(
            "These schedules trigger {time_desc} and affect {target_desc}. \
             They may interfere with each other."
        ),
    }
}

/// The schedule's trigger time moved `minutes` later, wrapped at midnight
/// and formatted `HH:MM`. Unparsable times pass through unchanged.
fn shifted_time(schedule: &Schedule, minutes: i64) -> String {
    let Trigger::Time { at, .. } = &schedule.trigger else {
        return String::new();
    };
    match time::parse_at(at) {
        Some(parsed) => (parsed + chrono::Duration::minutes(minutes))
            .format("%H:%M")
            .to_string(),
        None => at.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_domain::conflict::Severity;
    use lumen_domain::schedule::{LightIntent, LightParams, ScheduleAction};

    fn schedule(name: &str, at: &str, intent: LightIntent) -> Schedule {
        Schedule::builder()
            .name(name)
            .trigger(Trigger::at(at))
            .action(ScheduleAction::Light {
                intent,
                target: Some("all".to_string()),
                params: LightParams::default(),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn should_offer_time_adjustment_only_for_close_conflicts() {
        let candidate = schedule("New", "07:00", LightIntent::On);
        let existing = schedule("Old", "07:05", LightIntent::Off);

        let close = basic_resolutions(&candidate, &existing, 5);
        assert_eq!(close.len(), 3);
        assert_eq!(close[0].id, "adjust_new");
        assert_eq!(close[0].changes["new_time"], "07:15");

        let distant = basic_resolutions(&candidate, &existing, 20);
        assert_eq!(distant.len(), 2);
        assert_eq!(distant[0].id, "prioritize_existing");
        assert_eq!(distant[1].id, "replace_existing");
    }

    #[test]
    fn should_target_candidate_in_disable_and_existing_in_delete() {
        let candidate = schedule("New", "07:00", LightIntent::On);
        let existing = schedule("Old", "07:05", LightIntent::Off);

        let resolutions = basic_resolutions(&candidate, &existing, 5);
        let disable = resolutions.iter().find(|r| r.id == "prioritize_existing").unwrap();
        let delete = resolutions.iter().find(|r| r.id == "replace_existing").unwrap();

        assert_eq!(disable.changes["schedule_id"], serde_json::json!(candidate.id));
        assert_eq!(disable.action, ResolutionAction::Disable);
        assert_eq!(delete.changes["schedule_id"], serde_json::json!(existing.id));
        assert_eq!(delete.action, ResolutionAction::Delete);
    }

    #[test]
    fn should_wrap_adjusted_time_past_midnight() {
        let candidate = schedule("Late", "23:55", LightIntent::On);
        let existing = schedule("Old", "23:50", LightIntent::Off);

        let resolutions = basic_resolutions(&candidate, &existing, 5);
        assert_eq!(resolutions[0].changes["new_time"], "00:10");
    }

    #[test]
    fn should_describe_simultaneous_contradiction() {
        let text = describe(ConflictType::Contradiction, 0, "kitchen", "kitchen");
        assert!(text.contains("at the exact same time"));
        assert!(text.contains("the kitchen"));
        assert!(text.contains("flickering"));
    }

    #[test]
    fn should_describe_gap_in_minutes_and_mixed_targets() {
        let text = describe(ConflictType::TimingOverlap, 5, "all", "kitchen");
        assert!(text.contains("5 minutes apart"));
        assert!(text.contains("overlapping areas (including 'all' rooms)"));
    }

    #[test]
    fn should_humanize_underscored_target_names() {
        let text = describe(ConflictType::Duplicate, 3, "living_room", "Living Room");
        assert!(text.contains("the living room"));
    }

    #[test]
    fn should_build_full_conflict_record() {
        let candidate = schedule("Wake up", "07:00", LightIntent::On);
        let existing = schedule("Lights out", "07:05", LightIntent::Off);
        let info = ConflictInfo {
            minutes_diff: 5,
            target_a: "all".to_string(),
            target_b: "all".to_string(),
        };

        let conflict = build_conflict(&candidate, &existing, &info);
        assert_eq!(conflict.schedule_id, candidate.id);
        assert_eq!(conflict.other_id, existing.id);
        assert_eq!(conflict.conflict_type, ConflictType::Contradiction);
        assert_eq!(conflict.severity, Severity::Medium);
        assert_eq!(conflict.resolutions.len(), 3);
    }
}
