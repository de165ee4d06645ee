//! # lumen-adapter-virtual
//!
//! Virtual transport that simulates the physical light targets. Commands are
//! applied to in-memory light state and acknowledged back to the command
//! tracker after a configurable delay, so the whole confirmation pipeline
//! can run without hardware. Individual targets can be configured to drop
//! their acknowledgments to exercise the timeout path.
//!
//! ## Dependency rule
//!
//! Depends on `lumen-app` (port traits, tracker) and `lumen-domain` only.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use lumen_app::ports::{CommandPublisher, EventPublisher};
use lumen_app::rooms;
use lumen_app::tracker::CommandTracker;
use lumen_domain::command::LightCommand;
use lumen_domain::error::{LumenError, TransportError};

/// Simulated state of one light target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LightState {
    pub on: bool,
    pub brightness: Option<u8>,
    pub rgb: Option<[u8; 3]>,
    pub color_temp: Option<u16>,
}

impl LightState {
    fn apply(&mut self, command: &LightCommand) {
        if let Some(on) = command.on {
            self.on = on;
        }
        if command.brightness.is_some() {
            self.brightness = command.brightness;
        }
        if command.rgb.is_some() {
            self.rgb = command.rgb;
        }
        if command.color_temp.is_some() {
            self.color_temp = command.color_temp;
        }
    }
}

/// Virtual command bus addressing one simulated light per target index.
pub struct VirtualLightBus<B> {
    tracker: Arc<CommandTracker<B>>,
    lights: Mutex<Vec<LightState>>,
    ack_delay: Duration,
    silent_targets: HashSet<usize>,
}

impl<B: EventPublisher + Send + Sync + 'static> VirtualLightBus<B> {
    /// Create a bus with one simulated light per known target.
    #[must_use]
    pub fn new(tracker: Arc<CommandTracker<B>>) -> Self {
        Self {
            tracker,
            lights: Mutex::new(vec![LightState::default(); rooms::TARGET_COUNT]),
            ack_delay: Duration::from_millis(150),
            silent_targets: HashSet::new(),
        }
    }

    /// How long a simulated light waits before acknowledging.
    #[must_use]
    pub fn with_ack_delay(mut self, delay: Duration) -> Self {
        self.ack_delay = delay;
        self
    }

    /// Targets that accept commands but never acknowledge, to exercise the
    /// timeout path.
    #[must_use]
    pub fn with_silent_targets(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.silent_targets = indices.into_iter().collect();
        self
    }

    /// Snapshot of a simulated light's state.
    #[must_use]
    pub fn light(&self, index: usize) -> Option<LightState> {
        self.lights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }
}

impl<B: EventPublisher + Send + Sync + 'static> CommandPublisher for VirtualLightBus<B> {
    fn publish(
        &self,
        index: usize,
        command: LightCommand,
    ) -> impl Future<Output = Result<(), LumenError>> + Send {
        let applied = {
            let mut lights = self.lights.lock().unwrap_or_else(PoisonError::into_inner);
            match lights.get_mut(index) {
                Some(light) => {
                    light.apply(&command);
                    true
                }
                None => false,
            }
        };

        let ack = if applied {
            command.correlation_id.filter(|_| !self.silent_targets.contains(&index))
        } else {
            None
        };

        if applied {
            tracing::debug!(index, ?command.on, "applied command to virtual light");
        }

        if let Some(correlation_id) = ack {
            let tracker = Arc::clone(&self.tracker);
            let delay = self.ack_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                tracker.process_ack(correlation_id, true, index).await;
            });
        }

        async move {
            if applied {
                Ok(())
            } else {
                Err(TransportError::new(format!("no light at target index {index}")).into())
            }
        }
    }
}
