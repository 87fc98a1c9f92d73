//! Event manager trait.

use std::sync::Arc;

use crate::event::Event;

use super::EventListener;

/// Routes decoded events to registered listeners.
///
/// Implementations must tolerate `register`/`unregister` running concurrently
/// with `dispatch`: dispatch observes a consistent snapshot of the listener
/// set, a listener removed mid-dispatch may receive the in-flight event but
/// never a later one, and no lock is held while listener code runs.
pub trait EventManager: Send + Sync {
    /// Add a listener. Takes effect for the next dispatched event.
    fn register(&self, listener: Arc<dyn EventListener>);

    /// Remove a listener by pointer identity.
    fn unregister(&self, listener: &Arc<dyn EventListener>);

    /// Deliver one event to every currently registered listener, in
    /// registration order, isolating listener faults.
    fn dispatch(&self, event: &Event);
}
