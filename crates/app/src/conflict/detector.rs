//! Pairwise conflict detection between two schedules.
//!
//! Detection is purely structural: both schedules must be time-triggered,
//! land within a 30-minute window of each other, share at least one weekday
//! and overlap in targets. Classification and severity derive from the
//! schedules' primary intents and the time gap.

use chrono::Timelike;

use lumen_domain::conflict::{ConflictType, Severity};
use lumen_domain::schedule::{LightIntent, PrimaryIntent, Schedule, Trigger};
use lumen_domain::time;

use crate::rooms;

/// Two schedules count as conflicting only within this many minutes.
pub const CONFLICT_WINDOW_MINUTES: i64 = 30;

/// Structural facts about a detected pair, feeding classification and
/// description.
#[derive(Debug, Clone)]
pub struct ConflictInfo {
    pub minutes_diff: i64,
    pub target_a: String,
    pub target_b: String,
}

/// Check whether `a` and `b` structurally conflict.
///
/// The comparison uses absolute seconds-of-day difference, so a pair
/// straddling midnight (23:50 vs 00:05) is not detected. That mirrors the
/// historical behavior and is kept deliberately; see DESIGN.md.
#[must_use]
pub fn check_for_conflict(a: &Schedule, b: &Schedule) -> Option<ConflictInfo> {
    let (Trigger::Time { at: at_a, weekdays: days_a }, Trigger::Time { at: at_b, weekdays: days_b }) =
        (&a.trigger, &b.trigger)
    else {
        return None;
    };

    let time_a = time::parse_at(at_a)?;
    let time_b = time::parse_at(at_b)?;

    let seconds_a = i64::from(time_a.num_seconds_from_midnight());
    let seconds_b = i64::from(time_b.num_seconds_from_midnight());
    let minutes_diff = (seconds_a - seconds_b).abs() / 60;
    if minutes_diff > CONFLICT_WINDOW_MINUTES {
        return None;
    }

    if !days_overlap(days_a.as_deref(), days_b.as_deref()) {
        return None;
    }

    let target_a = a.primary_target().to_string();
    let target_b = b.primary_target().to_string();
    if !targets_overlap(&target_a, &target_b) {
        return None;
    }

    Some(ConflictInfo {
        minutes_diff,
        target_a,
        target_b,
    })
}

/// Whether the two weekday restrictions share at least one day.
///
/// An absent or empty restriction means daily, which overlaps anything.
fn days_overlap(a: Option<&[String]>, b: Option<&[String]>) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return true;
    };
    if a.is_empty() || b.is_empty() {
        return true;
    }
    a.iter()
        .any(|day_a| b.iter().any(|day_b| time::normalize_day(day_a) == time::normalize_day(day_b)))
}

/// Whether two first-action targets address at least one common room.
fn targets_overlap(a: &str, b: &str) -> bool {
    if a.eq_ignore_ascii_case("all") || b.eq_ignore_ascii_case("all") {
        return true;
    }
    rooms::normalize(a) == rooms::normalize(b)
}

/// Classify how two overlapping schedules interfere, from their primary
/// intents. Checked in order; the first match wins.
#[must_use]
pub fn classify(a: &Schedule, b: &Schedule) -> ConflictType {
    let intent_a = a.primary_intent();
    let intent_b = b.primary_intent();

    if matches!(
        (intent_a, intent_b),
        (PrimaryIntent::Light(LightIntent::On), PrimaryIntent::Light(LightIntent::Off))
            | (PrimaryIntent::Light(LightIntent::Off), PrimaryIntent::Light(LightIntent::On))
    ) {
        return ConflictType::Contradiction;
    }
    if intent_a == intent_b {
        return ConflictType::Duplicate;
    }
    if matches!((intent_a, intent_b), (PrimaryIntent::Scene, PrimaryIntent::Scene)) {
        return ConflictType::SceneOverlap;
    }
    if matches!(
        (intent_a, intent_b),
        (
            PrimaryIntent::Light(LightIntent::Brightness),
            PrimaryIntent::Light(LightIntent::Brightness)
        )
    ) {
        return ConflictType::BrightnessConflict;
    }
    ConflictType::TimingOverlap
}

/// Severity of a classified conflict, given the gap in minutes.
#[must_use]
pub fn severity(conflict_type: ConflictType, minutes_diff: i64) -> Severity {
    match conflict_type {
        ConflictType::Contradiction => {
            if minutes_diff == 0 {
                Severity::High
            } else {
                Severity::Medium
            }
        }
        ConflictType::Duplicate if minutes_diff == 0 => Severity::High,
        _ if minutes_diff <= 5 => Severity::Medium,
        _ => Severity::Low,
    }
}
