//! Conflict analysis for candidate schedules.
//!
//! Given a candidate schedule (new or edited, not yet committed), the
//! analyzer compares it pairwise against every enabled schedule, classifies
//! the overlaps, and produces ranked resolution options. An optional
//! reasoning collaborator may refine the summary and resolution ordering,
//! but never the classification itself.

mod detector;
mod enhancer;
mod resolution;

pub use detector::{CONFLICT_WINDOW_MINUTES, ConflictInfo};

use std::time::Duration;

use lumen_domain::conflict::{ConflictAnalysisResult, ScheduleConflict};
use lumen_domain::error::{LumenError, NotFoundError};
use lumen_domain::id::ScheduleId;
use lumen_domain::schedule::{Schedule, Trigger};

use crate::ports::{ReasoningService, ScheduleRepository};

/// Upper bound on one reasoning call during enhancement.
pub const REASONING_TIMEOUT: Duration = Duration::from_secs(10);

/// Detects conflicts for candidate schedules and applies resolutions.
pub struct ConflictAnalyzer<R, A> {
    schedules: R,
    reasoning: A,
    reasoning_timeout: Duration,
}

impl<R, A> ConflictAnalyzer<R, A>
where
    R: ScheduleRepository,
    A: ReasoningService,
{
    pub fn new(schedules: R, reasoning: A) -> Self {
        Self {
            schedules,
            reasoning,
            reasoning_timeout: REASONING_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_reasoning_timeout(mut self, timeout: Duration) -> Self {
        self.reasoning_timeout = timeout;
        self
    }

    /// Analyze `candidate` against every other enabled schedule.
    ///
    /// The candidate itself is excluded by id, so re-analyzing an edited
    /// schedule never reports it as conflicting with its stored version.
    ///
    /// # Errors
    ///
    /// Fails only when the schedule listing cannot be read. Reasoning
    /// failures degrade to the deterministic result, never to an error.
    pub async fn detect_conflicts(
        &self,
        candidate: &Schedule,
    ) -> Result<ConflictAnalysisResult, LumenError> {
        let existing: Vec<Schedule> = self
            .schedules
            .get_enabled()
            .await?
            .into_iter()
            .filter(|s| s.id != candidate.id)
            .collect();

        if existing.is_empty() {
            return Ok(ConflictAnalysisResult::clear(
                "No existing schedules to conflict with.",
            ));
        }

        let conflicts: Vec<ScheduleConflict> = existing
            .iter()
            .filter_map(|other| {
                detector::check_for_conflict(candidate, other)
                    .map(|info| resolution::build_conflict(candidate, other, &info))
            })
            .collect();

        if conflicts.is_empty() {
            return Ok(ConflictAnalysisResult::clear("No conflicts detected."));
        }

        tracing::info!(
            candidate = %candidate.name,
            count = conflicts.len(),
            "conflicts detected",
        );
        Ok(self.enhance(candidate, conflicts).await)
    }

    /// Refine the deterministic result through the reasoning collaborator.
    ///
    /// Absence, failure, timeout or an unparsable response all fall back to
    /// the deterministic conflicts with a generic summary.
    async fn enhance(
        &self,
        candidate: &Schedule,
        conflicts: Vec<ScheduleConflict>,
    ) -> ConflictAnalysisResult {
        if self.reasoning.is_configured() {
            let prompt = enhancer::build_prompt(candidate, &conflicts);
            match tokio::time::timeout(self.reasoning_timeout, self.reasoning.generate(&prompt))
                .await
            {
                Ok(Ok(response)) => {
                    if let Some((summary, enhanced)) =
                        enhancer::apply_enhancements(&response, &conflicts)
                    {
                        return ConflictAnalysisResult {
                            has_conflicts: true,
                            conflicts: enhanced,
                            summary,
                        };
                    }
                    tracing::warn!("unparsable reasoning response, using basic analysis");
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "reasoning enhancement failed, using basic analysis");
                }
                Err(_) => {
                    tracing::warn!("reasoning enhancement timed out, using basic analysis");
                }
            }
        }

        ConflictAnalysisResult {
            has_conflicts: true,
            summary: enhancer::fallback_summary(conflicts.len()),
            conflicts,
        }
    }

    /// Apply a previously offered resolution.
    ///
    /// Dispatches on the resolution id, accepting both the option ids
    /// (`adjust_new`, `prioritize_existing`, `replace_existing`) and their
    /// action kinds (`adjust_time`, `disable`, `delete`). Unknown ids are
    /// acknowledged generically rather than rejected; missing parameters
    /// yield a "could not be applied" message.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] when the referenced schedule does
    /// not exist, or a storage error from the repository.
    pub async fn apply_resolution(
        &self,
        schedule_id: ScheduleId,
        resolution_id: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<String, LumenError> {
        match resolution_id {
            "adjust_new" | "adjust_time" => {
                let Some(new_time) = params.get("new_time").and_then(serde_json::Value::as_str)
                else {
                    return Ok("Resolution could not be applied".to_string());
                };
                let mut schedule = self.get_schedule(schedule_id).await?;
                let Trigger::Time { at, .. } = &mut schedule.trigger else {
                    return Ok("Resolution could not be applied".to_string());
                };
                // Stored trigger times carry seconds precision.
                *at = format!("{new_time}:00");
                self.schedules.update(schedule).await?;
                Ok(format!("Schedule time adjusted to {new_time}"))
            }
            "disable" | "prioritize_existing" => {
                let Some(id) = self.schedule_id_param(params) else {
                    return Ok("Resolution could not be applied".to_string());
                };
                let mut schedule = self.get_schedule(id).await?;
                schedule.enabled = false;
                let schedule = self.schedules.update(schedule).await?;
                Ok(format!("Schedule '{}' has been disabled", schedule.name))
            }
            "delete" | "replace_existing" => {
                let Some(id) = self.schedule_id_param(params) else {
                    return Ok("Resolution could not be applied".to_string());
                };
                let schedule = self.get_schedule(id).await?;
                self.schedules.delete(schedule.id).await?;
                Ok(format!("Schedule '{}' has been deleted", schedule.name))
            }
            _ => Ok("Resolution applied (custom action)".to_string()),
        }
    }

    fn schedule_id_param(
        &self,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Option<ScheduleId> {
        params
            .get("schedule_id")
            .and_then(serde_json::Value::as_str)
            .and_then(|raw| raw.parse().ok())
    }

    async fn get_schedule(&self, id: ScheduleId) -> Result<Schedule, LumenError> {
        self.schedules
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::new("schedule", id.to_string()).into())
    }
}
