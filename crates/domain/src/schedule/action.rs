//! Action — the effect performed when a schedule fires.

use serde::{Deserialize, Serialize};

/// One step of a schedule, executed in order when the schedule fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleAction {
    /// Direct light control on a room (or `"all"`).
    Light {
        intent: LightIntent,
        /// Room name; `None` means `"all"`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        #[serde(default)]
        params: LightParams,
    },
    /// Apply a stored scene, optionally overriding its target.
    Scene {
        /// Scene id (UUID string) or scene name.
        scene: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl ScheduleAction {
    /// The room this action addresses, defaulting to `"all"`.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Light { target, .. } | Self::Scene { target, .. } => {
                target.as_deref().unwrap_or("all")
            }
        }
    }
}

/// What a light action does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightIntent {
    #[serde(rename = "light.on")]
    On,
    #[serde(rename = "light.off")]
    Off,
    #[serde(rename = "light.brightness")]
    Brightness,
    #[serde(rename = "light.color")]
    Color,
    #[serde(rename = "light.color_temp")]
    ColorTemp,
}

impl std::fmt::Display for LightIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::On => "light.on",
            Self::Off => "light.off",
            Self::Brightness => "light.brightness",
            Self::Color => "light.color",
            Self::ColorTemp => "light.color_temp",
        };
        f.write_str(s)
    }
}

/// Parameters carried by a light action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    /// Brightness percentage (0–100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// RGB color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb: Option<[u8; 3]>,
    /// Color temperature in kelvin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
}
