//! Conflict records — transient findings between two schedules.
//!
//! These are derived by the conflict analyzer and returned to callers; they
//! are never persisted.

use serde::{Deserialize, Serialize};

use crate::id::ScheduleId;

/// How two schedules interfere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Opposite on/off intents on the same targets.
    Contradiction,
    /// Identical intents; one is likely redundant.
    Duplicate,
    /// Two scenes applied close together; the later overrides the earlier.
    SceneOverlap,
    /// Different brightness levels close together.
    BrightnessConflict,
    /// Anything else inside the trigger window.
    TimingOverlap,
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Contradiction => "contradiction",
            Self::Duplicate => "duplicate",
            Self::SceneOverlap => "scene_overlap",
            Self::BrightnessConflict => "brightness_conflict",
            Self::TimingOverlap => "timing_overlap",
        };
        f.write_str(s)
    }
}

/// How much a conflict matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// The mechanical kind of a resolution option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionAction {
    AdjustTime,
    Disable,
    Delete,
    Custom,
}

/// One way to resolve a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictResolution {
    /// Stable id callers pass back to `apply_resolution` (e.g. `"adjust_new"`).
    pub id: String,
    pub description: String,
    pub action: ResolutionAction,
    /// Concrete parameters needed to apply the resolution mechanically
    /// (`schedule_id`, `new_time`, …).
    pub changes: serde_json::Map<String, serde_json::Value>,
}

/// A pairwise finding between the candidate schedule and an existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub schedule_id: ScheduleId,
    pub schedule_name: String,
    pub other_id: ScheduleId,
    pub other_name: String,
    pub conflict_type: ConflictType,
    pub description: String,
    pub severity: Severity,
    /// Ranked resolution options, best first.
    pub resolutions: Vec<ConflictResolution>,
}

/// The analyzer's answer for one candidate schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictAnalysisResult {
    pub has_conflicts: bool,
    pub conflicts: Vec<ScheduleConflict>,
    pub summary: String,
}

impl ConflictAnalysisResult {
    /// A result with no conflicts and the given summary.
    #[must_use]
    pub fn clear(summary: impl Into<String>) -> Self {
        Self {
            has_conflicts: false,
            conflicts: Vec::new(),
            summary: summary.into(),
        }
    }
}
