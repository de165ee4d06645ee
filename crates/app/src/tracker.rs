//! Command acknowledgment tracker.
//!
//! Gives the rest of the system an at-most-one-terminal-event guarantee for
//! fan-out commands sent to physical targets that acknowledge asynchronously
//! and out of order. Each registered command resolves to exactly one terminal
//! lifecycle notification: `CommandConfirmed` when every expected ack arrives,
//! or `CommandTimeout` when the window elapses first.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use lumen_domain::command::PendingCommand;
use lumen_domain::event::{Event, EventType};
use lumen_domain::id::{CorrelationId, SceneId};
use lumen_domain::time::{self, Timestamp};

use crate::ports::EventPublisher;

/// How long a fan-out may wait for its acknowledgments.
pub const DEFAULT_TIMEOUT: chrono::Duration = chrono::Duration::seconds(10);

/// Tracks pending fan-out commands and correlates their acknowledgments.
///
/// All state is in-memory and scoped to process lifetime: a restart loses
/// in-flight tracking, which at worst drops a notification, never a command.
pub struct CommandTracker<P> {
    publisher: P,
    pending: Mutex<HashMap<CorrelationId, PendingCommand>>,
    timeout: chrono::Duration,
}

impl<P: EventPublisher> CommandTracker<P> {
    /// Create a tracker with the default 10-second timeout window.
    pub fn new(publisher: P) -> Self {
        Self::with_timeout(publisher, DEFAULT_TIMEOUT)
    }

    /// Create a tracker with a custom timeout window.
    pub fn with_timeout(publisher: P, timeout: chrono::Duration) -> Self {
        Self {
            publisher,
            pending: Mutex::new(HashMap::new()),
            timeout,
        }
    }

    /// Register a fan-out command addressed to `expected_acks` targets.
    ///
    /// Emits a `CommandPending` notification and returns the correlation id
    /// the caller must embed in every outbound command of this fan-out.
    pub async fn register(
        &self,
        scene_id: Option<SceneId>,
        label: &str,
        expected_acks: usize,
    ) -> CorrelationId {
        self.register_at(scene_id, label, expected_acks, time::now())
            .await
    }

    /// [`register`](Self::register) with an explicit clock, for tests.
    pub async fn register_at(
        &self,
        scene_id: Option<SceneId>,
        label: &str,
        expected_acks: usize,
        now: Timestamp,
    ) -> CorrelationId {
        let command = PendingCommand::new(scene_id, label, expected_acks, now);
        let correlation_id = command.correlation_id;

        self.lock().insert(correlation_id, command);
        tracing::info!(%correlation_id, label, expected_acks, "registered pending command");

        self.emit(
            EventType::CommandPending,
            serde_json::json!({
                "correlation_id": correlation_id,
                "scene_id": scene_id,
                "label": label,
                "expected_acks": expected_acks,
            }),
        )
        .await;

        correlation_id
    }

    /// Process one asynchronous acknowledgment.
    ///
    /// Unknown correlation ids (duplicates, or late acks after a timeout)
    /// are logged and ignored. When the last expected ack arrives, the entry
    /// is removed and a single `CommandConfirmed` notification is emitted
    /// with the observed latency.
    pub async fn process_ack(&self, correlation_id: CorrelationId, success: bool, source: usize) {
        self.process_ack_at(correlation_id, success, source, time::now())
            .await;
    }

    /// [`process_ack`](Self::process_ack) with an explicit clock, for tests.
    pub async fn process_ack_at(
        &self,
        correlation_id: CorrelationId,
        success: bool,
        source: usize,
        now: Timestamp,
    ) {
        // Increment-and-compare and removal happen under the map lock, so a
        // concurrent sweep can never observe (and time out) an entry that the
        // final ack has already completed.
        let confirmed = {
            let mut pending = self.lock();
            let Some(command) = pending.get_mut(&correlation_id) else {
                tracing::warn!(%correlation_id, "received ack for unknown correlation id");
                return;
            };

            command.received_acks += 1;
            tracing::info!(
                %correlation_id,
                received = command.received_acks,
                expected = command.expected_acks,
                success,
                source,
                label = %command.label,
                "received ack",
            );

            if command.is_complete() {
                pending.remove(&correlation_id)
            } else {
                None
            }
        };

        if let Some(command) = confirmed {
            let latency_ms = (now - command.created_at).num_milliseconds();
            tracing::info!(
                %correlation_id,
                label = %command.label,
                expected = command.expected_acks,
                latency_ms,
                "command confirmed by all targets",
            );
            self.emit(
                EventType::CommandConfirmed,
                serde_json::json!({
                    "correlation_id": correlation_id,
                    "scene_id": command.scene_id,
                    "label": command.label,
                    "expected_acks": command.expected_acks,
                    "latency_ms": latency_ms,
                }),
            )
            .await;
        }
    }

    /// Remove every entry older than the timeout window and emit one
    /// `CommandTimeout` notification per removed entry.
    ///
    /// Runs on a fixed period independent of ack arrivals.
    pub async fn sweep(&self) {
        self.sweep_at(time::now()).await;
    }

    /// [`sweep`](Self::sweep) with an explicit clock, for tests.
    pub async fn sweep_at(&self, now: Timestamp) {
        let expired: Vec<PendingCommand> = {
            let mut pending = self.lock();
            let ids: Vec<CorrelationId> = pending
                .iter()
                .filter(|(_, command)| command.is_expired(now, self.timeout))
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter().filter_map(|id| pending.remove(&id)).collect()
        };

        for command in expired {
            tracing::warn!(
                correlation_id = %command.correlation_id,
                label = %command.label,
                received = command.received_acks,
                expected = command.expected_acks,
                "command timed out",
            );
            self.emit(
                EventType::CommandTimeout,
                serde_json::json!({
                    "correlation_id": command.correlation_id,
                    "scene_id": command.scene_id,
                    "label": command.label,
                    "received_acks": command.received_acks,
                    "expected_acks": command.expected_acks,
                }),
            )
            .await;
        }
    }

    /// Number of commands still awaiting acknowledgment.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CorrelationId, PendingCommand>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn emit(&self, event_type: EventType, data: serde_json::Value) {
        // Notification delivery is best-effort and must never affect tracking.
        if let Err(err) = self.publisher.publish(Event::new(event_type, data)).await {
            tracing::warn!(error = %err, "failed to publish lifecycle event");
        }
    }
}
