//! Event listener trait.

use crate::event::{Event, Subscriptions};

/// A registered recipient of decoded gateway events.
///
/// Listeners are identified by `Arc` pointer identity: the same `Arc` that
/// registered a listener removes it. Delivery is synchronous on the
/// frame-processing task, so handlers should return quickly.
///
/// A panicking handler is caught and logged by the event manager; it never
/// affects delivery to other listeners or the connection itself.
pub trait EventListener: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: &Event);

    /// Declared event interests.
    ///
    /// Consulted exactly once, at registration time, by subscription-filtering
    /// event managers; direct managers ignore it. The default is interest in
    /// every event.
    fn subscriptions(&self) -> Subscriptions {
        Subscriptions::all()
    }
}
