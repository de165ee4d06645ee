//! Reasoning-backed refinement of conflict analysis.
//!
//! The reasoning collaborator only ever improves presentation: the summary
//! text, an optional extra suggestion, and the ordering of resolution
//! options. Classification and severity are never touched, and any parse
//! failure falls back to the deterministic result.

use lumen_domain::conflict::{ConflictResolution, ResolutionAction, ScheduleConflict};
use lumen_domain::schedule::Schedule;

/// Summary used whenever the reasoning path is unavailable or fails.
#[must_use]
pub fn fallback_summary(conflict_count: usize) -> String {
    format!("Found {conflict_count} potential conflict(s). Review the suggested resolutions.")
}

/// Build the analysis prompt describing the candidate and its conflicts.
#[must_use]
pub fn build_prompt(candidate: &Schedule, conflicts: &[ScheduleConflict]) -> String {
    let candidate_json = serde_json::to_string(&serde_json::json!({
        "name": candidate.name,
        "trigger": candidate.trigger,
        "actions": candidate.actions,
    }))
    .unwrap_or_else(|_| candidate.name.clone());

    let mut prompt = String::from(
        "You are a smart home schedule conflict analyzer. \
         Analyze these lighting schedule conflicts and provide enhanced resolutions.\n\n\
         New Schedule:\n",
    );
    prompt.push_str(&candidate_json);
    prompt.push_str("\n\nDetected Conflicts:\n");

    for (i, conflict) in conflicts.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} vs {}\n   Type: {}, Severity: {}\n   Description: {}\n",
            i + 1,
            conflict.schedule_name,
            conflict.other_name,
            conflict.conflict_type,
            conflict.severity,
            conflict.description,
        ));
    }

    prompt.push_str(
        "\nProvide a JSON response with:\n\
         {\n\
         \x20 \"summary\": \"A user-friendly summary of all conflicts (1-2 sentences)\",\n\
         \x20 \"enhanced_resolutions\": [\n\
         \x20   {\n\
         \x20     \"conflict_index\": 0,\n\
         \x20     \"best_resolution\": \"The ID of the best resolution from the existing options\",\n\
         \x20     \"reasoning\": \"Why this is the best choice\",\n\
         \x20     \"additional_suggestion\": \"Any smart alternative not in the basic options (optional)\"\n\
         \x20   }\n\
         \x20 ],\n\
         \x20 \"user_tip\": \"A helpful tip for avoiding future conflicts\"\n\
         }\n\n\
         Be practical and consider real-world lighting usage patterns. For example:\n\
         - Morning routines need gradual wake-up lighting\n\
         - Bedtime should have dimming sequences\n\
         - Contradicting on/off commands are usually user errors\n\
         - Similar scenes close together are often intended as backups\n",
    );

    prompt
}

/// Merge a reasoning response into the deterministic conflicts.
///
/// Returns `None` when the response is not a JSON object, signalling the
/// caller to fall back. Within a parsable response every field is optional:
/// missing pieces leave the corresponding deterministic output untouched.
#[must_use]
pub fn apply_enhancements(
    response: &str,
    conflicts: &[ScheduleConflict],
) -> Option<(String, Vec<ScheduleConflict>)> {
    let root: serde_json::Value = serde_json::from_str(response).ok()?;
    if !root.is_object() {
        return None;
    }

    let mut summary = root
        .get("summary")
        .and_then(serde_json::Value::as_str)
        .map_or_else(
            || format!("Found {} potential conflict(s).", conflicts.len()),
            ToString::to_string,
        );
    if let Some(tip) = root.get("user_tip").and_then(serde_json::Value::as_str) {
        if !tip.is_empty() {
            summary.push_str(" Tip: ");
            summary.push_str(tip);
        }
    }

    let enhancements = root.get("enhanced_resolutions");
    let enhanced = conflicts
        .iter()
        .enumerate()
        .map(|(index, conflict)| enhance_conflict(conflict, enhancements, index))
        .collect();

    Some((summary, enhanced))
}

fn enhance_conflict(
    original: &ScheduleConflict,
    enhancements: Option<&serde_json::Value>,
    index: usize,
) -> ScheduleConflict {
    let entry = enhancements
        .and_then(serde_json::Value::as_array)
        .and_then(|list| {
            list.iter().find(|e| {
                e.get("conflict_index")
                    .and_then(serde_json::Value::as_u64)
                    .and_then(|i| usize::try_from(i).ok())
                    .is_some_and(|i| i == index)
            })
        });

    let suggestion = entry
        .and_then(|e| e.get("additional_suggestion"))
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty());
    let best_id = entry
        .and_then(|e| e.get("best_resolution"))
        .and_then(serde_json::Value::as_str);

    let mut resolutions = original.resolutions.clone();

    if let Some(suggestion) = suggestion {
        let mut changes = serde_json::Map::new();
        changes.insert("ai_generated".to_string(), serde_json::Value::Bool(true));
        resolutions.insert(
            0,
            ConflictResolution {
                id: "ai_suggested".to_string(),
                description: suggestion.to_string(),
                action: ResolutionAction::Custom,
                changes,
            },
        );
    }

    if let Some(best_id) = best_id {
        // Stable re-rank: the named best first, the generated suggestion
        // second, everything else in its original order.
        resolutions.sort_by_key(|r| {
            if r.id == best_id {
                0
            } else if r.id == "ai_suggested" {
                1
            } else {
                2
            }
        });
    }

    ScheduleConflict {
        resolutions,
        ..original.clone()
    }
}
