//! Event bus port — publish/subscribe for lifecycle notifications.

use std::future::Future;

use lumen_domain::error::LumenError;
use lumen_domain::event::Event;

/// Publishes lifecycle events to interested subscribers.
///
/// Emission is best-effort: publishing with no subscribers succeeds, and
/// callers never block correctness on delivery.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LumenError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), LumenError>> + Send {
        (**self).publish(event)
    }
}
