//! Storage ports — persistence for schedules and scenes.
//!
//! How schedules are stored is outside the core; these traits are the whole
//! contract. The scheduler only reads enabled time schedules and writes back
//! execution statistics; the conflict analyzer reads enabled schedules and
//! persists resolution-driven mutations.

use std::future::Future;

use lumen_domain::error::LumenError;
use lumen_domain::id::{SceneId, ScheduleId};
use lumen_domain::scene::Scene;
use lumen_domain::schedule::Schedule;

/// Repository for persisting and querying [`Schedule`]s.
pub trait ScheduleRepository {
    /// Create a new schedule in storage.
    fn create(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, LumenError>> + Send;

    /// Get a schedule by its unique identifier.
    fn get_by_id(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Option<Schedule>, LumenError>> + Send;

    /// Get all schedules.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send;

    /// Get all enabled schedules.
    fn get_enabled(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send;

    /// Get all enabled schedules with a time trigger (the scheduler's view).
    fn get_enabled_time(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send;

    /// Update an existing schedule (including execution statistics).
    fn update(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, LumenError>> + Send;

    /// Delete a schedule by its unique identifier.
    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), LumenError>> + Send;
}

impl<T: ScheduleRepository + Send + Sync> ScheduleRepository for std::sync::Arc<T> {
    fn create(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, LumenError>> + Send {
        (**self).create(schedule)
    }

    fn get_by_id(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Option<Schedule>, LumenError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
        (**self).get_all()
    }

    fn get_enabled(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
        (**self).get_enabled()
    }

    fn get_enabled_time(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
        (**self).get_enabled_time()
    }

    fn update(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, LumenError>> + Send {
        (**self).update(schedule)
    }

    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), LumenError>> + Send {
        (**self).delete(id)
    }
}

/// Repository for reading [`Scene`]s.
pub trait SceneRepository {
    /// Get a scene by its unique identifier.
    fn get_by_id(
        &self,
        id: SceneId,
    ) -> impl Future<Output = Result<Option<Scene>, LumenError>> + Send;

    /// Find an active scene by case-insensitive name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Scene>, LumenError>> + Send;
}

impl<T: SceneRepository + Send + Sync> SceneRepository for std::sync::Arc<T> {
    fn get_by_id(
        &self,
        id: SceneId,
    ) -> impl Future<Output = Result<Option<Scene>, LumenError>> + Send {
        (**self).get_by_id(id)
    }

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Scene>, LumenError>> + Send {
        (**self).find_by_name(name)
    }
}
