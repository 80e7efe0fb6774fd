use async_trait::async_trait;

use super::SessionEvent;

/// Handles session events.
///
/// Listeners are called in registration order, awaited one at a time. A
/// listener must not panic; there is no isolation between listeners.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    async fn handle(&self, event: &SessionEvent);
}
