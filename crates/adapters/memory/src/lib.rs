//! # lumen-adapter-memory
//!
//! In-memory implementations of the storage ports. State lives in hash maps
//! behind `RwLock`s and is lost on process exit, which fits the core's
//! no-persistence stance for demos and tests.
//!
//! ## Dependency rule
//!
//! Depends on `lumen-app` (port traits) and `lumen-domain` only.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use lumen_app::ports::{SceneRepository, ScheduleRepository};
use lumen_domain::error::LumenError;
use lumen_domain::id::{SceneId, ScheduleId};
use lumen_domain::scene::Scene;
use lumen_domain::schedule::Schedule;

/// Schedule repository backed by a hash map.
#[derive(Default)]
pub struct InMemoryScheduleRepository {
    store: RwLock<HashMap<ScheduleId, Schedule>>,
}

impl InMemoryScheduleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the repository, for wiring demo data at startup.
    #[must_use]
    pub fn with_schedules(schedules: Vec<Schedule>) -> Self {
        Self {
            store: RwLock::new(schedules.into_iter().map(|s| (s.id, s)).collect()),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ScheduleId, Schedule>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ScheduleId, Schedule>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScheduleRepository for InMemoryScheduleRepository {
    fn create(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, LumenError>> + Send {
        self.write().insert(schedule.id, schedule.clone());
        async { Ok(schedule) }
    }

    fn get_by_id(
        &self,
        id: ScheduleId,
    ) -> impl Future<Output = Result<Option<Schedule>, LumenError>> + Send {
        let found = self.read().get(&id).cloned();
        async { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
        let all: Vec<Schedule> = self.read().values().cloned().collect();
        async { Ok(all) }
    }

    fn get_enabled(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
        let enabled: Vec<Schedule> = self
            .read()
            .values()
            .filter(|s| s.enabled)
            .cloned()
            .collect();
        async { Ok(enabled) }
    }

    fn get_enabled_time(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
        let due: Vec<Schedule> = self
            .read()
            .values()
            .filter(|s| s.enabled && s.trigger.is_time())
            .cloned()
            .collect();
        async { Ok(due) }
    }

    fn update(
        &self,
        schedule: Schedule,
    ) -> impl Future<Output = Result<Schedule, LumenError>> + Send {
        self.write().insert(schedule.id, schedule.clone());
        async { Ok(schedule) }
    }

    fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), LumenError>> + Send {
        self.write().remove(&id);
        async { Ok(()) }
    }
}

/// Scene repository backed by a hash map.
#[derive(Default)]
pub struct InMemorySceneRepository {
    store: RwLock<HashMap<SceneId, Scene>>,
}

impl InMemorySceneRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the repository, for wiring demo data at startup.
    #[must_use]
    pub fn with_scenes(scenes: Vec<Scene>) -> Self {
        Self {
            store: RwLock::new(scenes.into_iter().map(|s| (s.id, s)).collect()),
        }
    }

    /// Insert or replace a scene.
    pub fn upsert(&self, scene: Scene) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scene.id, scene);
    }
}

impl SceneRepository for InMemorySceneRepository {
    fn get_by_id(
        &self,
        id: SceneId,
    ) -> impl Future<Output = Result<Option<Scene>, LumenError>> + Send {
        let found = self
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        async { Ok(found) }
    }

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Scene>, LumenError>> + Send {
        let found = self
            .store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|s| s.active && s.name.eq_ignore_ascii_case(name))
            .cloned();
        async { Ok(found) }
    }
}
