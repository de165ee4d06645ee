//! Light commands and in-flight fan-out tracking state.

use serde::{Deserialize, Serialize};

use crate::id::{CorrelationId, SceneId};
use crate::scene::SceneSettings;
use crate::schedule::{LightIntent, LightParams};
use crate::time::Timestamp;

/// The payload published to one physical target.
///
/// Commands carry partial state: only the fields that are present are
/// applied, so unrelated settings on the target stay untouched. There is no
/// global "mode" field; every change is expressed through these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
    /// Present when the command belongs to a tracked fan-out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl LightCommand {
    /// Build the payload for a direct light intent.
    #[must_use]
    pub fn for_intent(intent: LightIntent, params: &LightParams) -> Self {
        match intent {
            LightIntent::On => Self {
                on: Some(true),
                ..Self::default()
            },
            LightIntent::Off => Self {
                on: Some(false),
                ..Self::default()
            },
            LightIntent::Brightness => Self {
                on: Some(true),
                brightness: params.brightness,
                ..Self::default()
            },
            LightIntent::Color => Self {
                on: Some(true),
                rgb: params.rgb,
                ..Self::default()
            },
            LightIntent::ColorTemp => Self {
                on: Some(true),
                color_temp: params.color_temp,
                ..Self::default()
            },
        }
    }

    /// Build the payload for applying a scene's stored settings.
    #[must_use]
    pub fn for_scene(settings: &SceneSettings) -> Self {
        Self {
            on: Some(true),
            brightness: settings.brightness,
            rgb: settings.rgb,
            color_temp: settings.color_temp,
            correlation_id: None,
        }
    }

    /// Attach a correlation id so acknowledgments can be matched back.
    #[must_use]
    pub fn with_correlation(mut self, id: CorrelationId) -> Self {
        self.correlation_id = Some(id);
        self
    }
}

/// One fan-out command awaiting acknowledgment.
///
/// Exists in the tracker's map for the half-open interval between
/// registration and its single terminal resolution (confirmed or timed out);
/// afterwards it is removed exactly once and never reappears under the same
/// correlation id.
#[derive(Debug, Clone)]
pub struct PendingCommand {
    pub correlation_id: CorrelationId,
    /// Set when the fan-out applies a scene.
    pub scene_id: Option<SceneId>,
    /// Display name for lifecycle notifications.
    pub label: String,
    /// Target count, fixed at creation.
    pub expected_acks: usize,
    pub received_acks: usize,
    pub created_at: Timestamp,
}

impl PendingCommand {
    #[must_use]
    pub fn new(
        scene_id: Option<SceneId>,
        label: impl Into<String>,
        expected_acks: usize,
        created_at: Timestamp,
    ) -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            scene_id,
            label: label.into(),
            expected_acks,
            received_acks: 0,
            created_at,
        }
    }

    /// Whether all expected acknowledgments have arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.received_acks >= self.expected_acks
    }

    /// Whether the command has outlived the timeout window at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp, timeout: chrono::Duration) -> bool {
        now - self.created_at > timeout
    }
}
