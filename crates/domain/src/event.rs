//! Event — a lifecycle notification broadcast to interested observers.
//!
//! Events are produced when fan-out commands change state (pending,
//! confirmed, timeout) and when schedules are created, updated, toggled,
//! deleted, or fired. Delivery is best-effort; no acknowledgment is expected.

use serde::{Deserialize, Serialize};

use crate::id::EventId;
use crate::time::Timestamp;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    CommandPending,
    CommandConfirmed,
    CommandTimeout,
    ScheduleTriggered,
    ScheduleCreated,
    ScheduleUpdated,
    ScheduleToggled,
    ScheduleDeleted,
}

/// An immutable notification record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: EventType,
    pub timestamp: Timestamp,
    /// Type-specific payload (correlation ids, ack counts, schedule names…).
    pub data: serde_json::Value,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(event_type: EventType, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            timestamp: crate::time::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_stamp_new_events_with_fresh_id() {
        let a = Event::new(EventType::CommandPending, serde_json::json!({}));
        let b = Event::new(EventType::CommandPending, serde_json::json!({}));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn should_serialize_event_type_as_snake_case() {
        let json = serde_json::to_string(&EventType::CommandTimeout).unwrap();
        assert_eq!(json, "\"command_timeout\"");
    }

    #[test]
    fn should_roundtrip_event_through_serde_json() {
        let event = Event::new(
            EventType::ScheduleTriggered,
            serde_json::json!({"schedule_name": "Morning lights", "trigger_count": 4}),
        );
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, event.id);
        assert_eq!(parsed.event_type, event.event_type);
        assert_eq!(parsed.data, event.data);
    }
}
