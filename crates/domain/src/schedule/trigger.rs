//! Trigger — when a schedule should fire.

use serde::{Deserialize, Serialize};

/// Describes when a schedule activates.
///
/// Only `Time` triggers are evaluated by the scheduler. `Sun` and `Sensor`
/// exist in the data model but have no evaluator yet; their configuration is
/// kept opaque until one does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires at a wall-clock time, optionally restricted to weekdays.
    Time {
        /// Wall-clock time as `"HH:MM"` or `"HH:MM:SS"`. Kept as a string and
        /// parsed at evaluation time so malformed user input is skipped and
        /// logged rather than rejected at construction.
        at: String,
        /// 3-letter lowercase day codes (`"mon"` .. `"sun"`). `None` or an
        /// empty list means every day.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        weekdays: Option<Vec<String>>,
    },
    /// Fires relative to sunrise/sunset. No evaluator exists for this yet.
    Sun {
        #[serde(default)]
        config: serde_json::Value,
    },
    /// Fires on a sensor reading. No evaluator exists for this yet.
    Sensor {
        #[serde(default)]
        config: serde_json::Value,
    },
}

impl Trigger {
    /// Convenience constructor for a daily time trigger.
    #[must_use]
    pub fn at(time: impl Into<String>) -> Self {
        Self::Time {
            at: time.into(),
            weekdays: None,
        }
    }

    /// Convenience constructor for a weekday-restricted time trigger.
    #[must_use]
    pub fn at_on(time: impl Into<String>, weekdays: &[&str]) -> Self {
        Self::Time {
            at: time.into(),
            weekdays: Some(weekdays.iter().map(ToString::to_string).collect()),
        }
    }

    /// Whether this is a time trigger (the only kind the scheduler evaluates).
    #[must_use]
    pub fn is_time(&self) -> bool {
        matches!(self, Self::Time { .. })
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Time { at, .. } => write!(f, "time({at})"),
            Self::Sun { .. } => f.write_str("sun"),
            Self::Sensor { .. } => f.write_str("sensor"),
        }
    }
}
