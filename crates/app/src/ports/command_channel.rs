//! Outbound command channel port — fire-and-forget delivery to targets.

use std::future::Future;

use lumen_domain::command::LightCommand;
use lumen_domain::error::LumenError;

/// Publishes one light command to one physical target.
///
/// Delivery is fire-and-forget: a publish failure is logged by the caller
/// and never affects acknowledgment tracking or other targets in the same
/// fan-out.
pub trait CommandPublisher {
    /// Publish `command` to the target at `index`.
    fn publish(
        &self,
        index: usize,
        command: LightCommand,
    ) -> impl Future<Output = Result<(), LumenError>> + Send;
}

impl<T: CommandPublisher + Send + Sync> CommandPublisher for std::sync::Arc<T> {
    fn publish(
        &self,
        index: usize,
        command: LightCommand,
    ) -> impl Future<Output = Result<(), LumenError>> + Send {
        (**self).publish(index, command)
    }
}
