//! Event dispatch strategies.
//!
//! Two interchangeable [`EventManager`](accord_core::EventManager)
//! implementations are provided: [`DirectEventManager`] delivers every event
//! to every listener, [`SubscriptionEventManager`] filters by the interests
//! a listener declared at registration time. The strategy is fixed when a
//! session is built; a live session never switches.

mod direct;
mod subscription;

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::error;

use accord_core::{Event, EventListener};

pub use direct::DirectEventManager;
pub use subscription::SubscriptionEventManager;

/// Which event manager a session builder should construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchStrategy {
    /// Every listener receives every event.
    #[default]
    Direct,
    /// Listeners receive only the events they declared interest in.
    Subscription,
}

/// Deliver one event to one listener, isolating faults.
///
/// A panicking handler must never break delivery to the remaining listeners
/// or take down the connection.
pub(crate) fn deliver(listener: &dyn EventListener, event: &Event) {
    let outcome = catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
    if outcome.is_err() {
        error!(
            kind = ?event.kind(),
            "listener panicked while handling event; continuing with remaining listeners"
        );
    }
}
