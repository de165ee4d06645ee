//! Schedule service — use-cases for managing schedules.

use lumen_domain::error::{LumenError, NotFoundError};
use lumen_domain::event::{Event, EventType};
use lumen_domain::id::ScheduleId;
use lumen_domain::schedule::Schedule;

use crate::ports::{EventPublisher, ScheduleRepository};

/// Application service for schedule CRUD operations.
///
/// Every mutation emits a lifecycle notification so observers (dashboards,
/// logs) can follow schedule changes without polling the store.
pub struct ScheduleService<R, B> {
    repo: R,
    events: B,
}

impl<R: ScheduleRepository, B: EventPublisher> ScheduleService<R, B> {
    /// Create a new service backed by the given repository and event bus.
    pub fn new(repo: R, events: B) -> Self {
        Self { repo, events }
    }

    /// Create a new schedule after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Validation`] if invariants fail, or a storage
    /// error propagated from the repository.
    #[tracing::instrument(skip(self, schedule), fields(schedule_name = %schedule.name))]
    pub async fn create_schedule(&self, schedule: Schedule) -> Result<Schedule, LumenError> {
        schedule.validate()?;
        let created = self.repo.create(schedule).await?;
        self.emit(EventType::ScheduleCreated, &created).await;
        Ok(created)
    }

    /// Look up a schedule by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] when no schedule with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_schedule(&self, id: ScheduleId) -> Result<Schedule, LumenError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError::new("Schedule", id.to_string()).into())
    }

    /// List all schedules.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_schedules(&self) -> Result<Vec<Schedule>, LumenError> {
        self.repo.get_all().await
    }

    /// Get all enabled schedules.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_enabled(&self) -> Result<Vec<Schedule>, LumenError> {
        self.repo.get_enabled().await
    }

    /// Update an existing schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Validation`] if invariants fail, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, schedule))]
    pub async fn update_schedule(&self, schedule: Schedule) -> Result<Schedule, LumenError> {
        schedule.validate()?;
        let updated = self.repo.update(schedule).await?;
        self.emit(EventType::ScheduleUpdated, &updated).await;
        Ok(updated)
    }

    /// Enable or disable a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] when the schedule does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn set_enabled(
        &self,
        id: ScheduleId,
        enabled: bool,
    ) -> Result<Schedule, LumenError> {
        let mut schedule = self.get_schedule(id).await?;
        schedule.enabled = enabled;
        let updated = self.repo.update(schedule).await?;
        self.emit(EventType::ScheduleToggled, &updated).await;
        Ok(updated)
    }

    /// Delete a schedule by id.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::NotFound`] when the schedule does not exist,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_schedule(&self, id: ScheduleId) -> Result<(), LumenError> {
        let schedule = self.get_schedule(id).await?;
        self.repo.delete(id).await?;
        self.emit(EventType::ScheduleDeleted, &schedule).await;
        Ok(())
    }

    async fn emit(&self, event_type: EventType, schedule: &Schedule) {
        let event = Event::new(
            event_type,
            serde_json::json!({
                "schedule_id": schedule.id,
                "schedule_name": schedule.name,
                "enabled": schedule.enabled,
            }),
        );
        if let Err(err) = self.events.publish(event).await {
            tracing::warn!(error = %err, "failed to publish schedule lifecycle event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_domain::error::ValidationError;
    use lumen_domain::schedule::{LightIntent, LightParams, ScheduleAction, Trigger};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    struct InMemoryScheduleRepo {
        store: Mutex<HashMap<ScheduleId, Schedule>>,
    }

    impl Default for InMemoryScheduleRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(HashMap::new()),
            }
        }
    }

    impl ScheduleRepository for InMemoryScheduleRepo {
        fn create(
            &self,
            schedule: Schedule,
        ) -> impl Future<Output = Result<Schedule, LumenError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(schedule.id, schedule.clone());
            async { Ok(schedule) }
        }

        fn get_by_id(
            &self,
            id: ScheduleId,
        ) -> impl Future<Output = Result<Option<Schedule>, LumenError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Schedule> = store.values().cloned().collect();
            async { Ok(result) }
        }

        fn get_enabled(&self) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Schedule> = store.values().filter(|s| s.enabled).cloned().collect();
            async { Ok(result) }
        }

        fn get_enabled_time(
            &self,
        ) -> impl Future<Output = Result<Vec<Schedule>, LumenError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<Schedule> = store
                .values()
                .filter(|s| s.enabled && s.trigger.is_time())
                .cloned()
                .collect();
            async { Ok(result) }
        }

        fn update(
            &self,
            schedule: Schedule,
        ) -> impl Future<Output = Result<Schedule, LumenError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(schedule.id, schedule.clone());
            async { Ok(schedule) }
        }

        fn delete(&self, id: ScheduleId) -> impl Future<Output = Result<(), LumenError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.remove(&id);
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct SpyEventBus {
        events: Mutex<Vec<Event>>,
    }

    impl SpyEventBus {
        fn types(&self) -> Vec<EventType> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type)
                .collect()
        }
    }

    impl EventPublisher for SpyEventBus {
        fn publish(&self, event: Event) -> impl Future<Output = Result<(), LumenError>> + Send {
            self.events.lock().unwrap().push(event);
            async { Ok(()) }
        }
    }

    fn make_service() -> ScheduleService<InMemoryScheduleRepo, SpyEventBus> {
        ScheduleService::new(InMemoryScheduleRepo::default(), SpyEventBus::default())
    }

    fn valid_schedule() -> Schedule {
        Schedule::builder()
            .name("Morning lights")
            .trigger(Trigger::at_on("07:00", &["mon", "tue", "wed", "thu", "fri"]))
            .action(ScheduleAction::Light {
                intent: LightIntent::On,
                target: Some("all".to_string()),
                params: LightParams::default(),
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_schedule_and_emit_created_event() {
        let svc = make_service();
        let schedule = valid_schedule();
        let id = schedule.id;

        let created = svc.create_schedule(schedule).await.unwrap();
        assert_eq!(created.id, id);
        assert_eq!(svc.events.types(), vec![EventType::ScheduleCreated]);

        let fetched = svc.get_schedule(id).await.unwrap();
        assert_eq!(fetched.name, "Morning lights");
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let svc = make_service();
        let mut schedule = valid_schedule();
        schedule.name = String::new();

        let result = svc.create_schedule(schedule).await;
        assert!(matches!(
            result,
            Err(LumenError::Validation(ValidationError::EmptyName))
        ));
        assert!(svc.events.types().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_when_schedule_missing() {
        let svc = make_service();
        let result = svc.get_schedule(ScheduleId::new()).await;
        assert!(matches!(result, Err(LumenError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_only_enabled_schedules() {
        let svc = make_service();
        svc.create_schedule(valid_schedule()).await.unwrap();

        let mut disabled = valid_schedule();
        disabled.name = "Disabled".to_string();
        disabled.enabled = false;
        svc.create_schedule(disabled).await.unwrap();

        let enabled = svc.list_enabled().await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert!(enabled[0].enabled);
        assert_eq!(svc.list_schedules().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_update_schedule_and_emit_updated_event() {
        let svc = make_service();
        let schedule = valid_schedule();
        let id = schedule.id;
        svc.create_schedule(schedule).await.unwrap();

        let mut updated = svc.get_schedule(id).await.unwrap();
        updated.name = "Updated name".to_string();
        let saved = svc.update_schedule(updated).await.unwrap();

        assert_eq!(saved.name, "Updated name");
        assert_eq!(
            svc.events.types(),
            vec![EventType::ScheduleCreated, EventType::ScheduleUpdated]
        );
    }

    #[tokio::test]
    async fn should_toggle_schedule_and_emit_toggled_event() {
        let svc = make_service();
        let schedule = valid_schedule();
        let id = schedule.id;
        svc.create_schedule(schedule).await.unwrap();

        let disabled = svc.set_enabled(id, false).await.unwrap();
        assert!(!disabled.enabled);
        assert_eq!(
            svc.events.types(),
            vec![EventType::ScheduleCreated, EventType::ScheduleToggled]
        );
    }

    #[tokio::test]
    async fn should_delete_schedule_and_emit_deleted_event() {
        let svc = make_service();
        let schedule = valid_schedule();
        let id = schedule.id;
        svc.create_schedule(schedule).await.unwrap();

        svc.delete_schedule(id).await.unwrap();

        let result = svc.get_schedule(id).await;
        assert!(matches!(result, Err(LumenError::NotFound(_))));
        assert_eq!(
            svc.events.types(),
            vec![EventType::ScheduleCreated, EventType::ScheduleDeleted]
        );
    }

    #[tokio::test]
    async fn should_fail_delete_for_missing_schedule() {
        let svc = make_service();
        let result = svc.delete_schedule(ScheduleId::new()).await;
        assert!(matches!(result, Err(LumenError::NotFound(_))));
    }
}
