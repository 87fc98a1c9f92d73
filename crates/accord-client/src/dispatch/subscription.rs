//! Subscription-filtered event dispatch.

use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use accord_core::{Event, EventListener, EventManager, Subscriptions};

use super::deliver;

struct Registration {
    listener: Arc<dyn EventListener>,
    // Declared interests, captured once at registration. A listener that
    // changes what subscriptions() returns later is not re-inspected.
    subscriptions: Subscriptions,
}

/// Delivers events only to listeners whose declared interests match the
/// event's kind, exactly or through a category supertype.
///
/// Each listener's [`EventListener::subscriptions`] is inspected once at
/// registration time and cached, so dispatch pays no inspection cost per
/// event. Ordering and fault isolation follow [`DirectEventManager`]
/// (registration order, snapshot under lock, panics contained).
///
/// [`DirectEventManager`]: super::DirectEventManager
#[derive(Default)]
pub struct SubscriptionEventManager {
    registrations: RwLock<Vec<Registration>>,
}

impl SubscriptionEventManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventManager for SubscriptionEventManager {
    fn register(&self, listener: Arc<dyn EventListener>) {
        let subscriptions = listener.subscriptions();
        if subscriptions.is_empty() {
            debug!("listener declared no subscriptions; it will receive no events");
        }
        self.registrations
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Registration {
                listener,
                subscriptions,
            });
    }

    fn unregister(&self, listener: &Arc<dyn EventListener>) {
        self.registrations
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|r| !Arc::ptr_eq(&r.listener, listener));
    }

    fn dispatch(&self, event: &Event) {
        let kind = event.kind();
        let matching: Vec<_> = self
            .registrations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.subscriptions.matches(kind))
            .map(|r| r.listener.clone())
            .collect();
        trace!(?kind, listeners = matching.len(), "dispatching event");
        for listener in &matching {
            deliver(listener.as_ref(), event);
        }
    }
}
