//! Scene — a named lighting preset.

use serde::{Deserialize, Serialize};

use crate::id::SceneId;

/// A stored lighting preset that schedules and direct callers can apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    /// Inactive scenes are not resolvable by name.
    pub active: bool,
    pub settings: SceneSettings,
}

impl Scene {
    #[must_use]
    pub fn new(name: impl Into<String>, settings: SceneSettings) -> Self {
        Self {
            id: SceneId::new(),
            name: name.into(),
            active: true,
            settings,
        }
    }
}

/// The light settings a scene carries. All fields are optional; only the
/// ones present are merged into the outgoing command payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb: Option<[u8; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
    /// Default room when the applying action specifies none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}
