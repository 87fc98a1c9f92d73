//! Direct event dispatch.

use std::sync::{Arc, RwLock};

use tracing::trace;

use accord_core::{Event, EventListener, EventManager};

use super::deliver;

/// Delivers every event to every registered listener, in registration
/// order, synchronously on the dispatching task.
///
/// Dispatch takes a snapshot of the listener set under the lock and invokes
/// handlers with the lock released, so a handler may freely register or
/// unregister listeners. A listener removed mid-dispatch may still receive
/// the in-flight event but never a later one.
#[derive(Default)]
pub struct DirectEventManager {
    listeners: RwLock<Vec<Arc<dyn EventListener>>>,
}

impl DirectEventManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventManager for DirectEventManager {
    fn register(&self, listener: Arc<dyn EventListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    fn unregister(&self, listener: &Arc<dyn EventListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    fn dispatch(&self, event: &Event) {
        let snapshot: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        trace!(kind = ?event.kind(), listeners = snapshot.len(), "dispatching event");
        for listener in &snapshot {
            deliver(listener.as_ref(), event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::OnceLock;

    use accord_core::EventKind;

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl EventListener for Recorder {
        fn on_event(&self, _event: &Event) {
            self.log.lock().unwrap().push(self.label);
        }
    }

    struct Panicker;

    impl EventListener for Panicker {
        fn on_event(&self, _event: &Event) {
            panic!("listener fault");
        }
    }

    /// Unregisters a target listener while handling an event.
    struct Remover {
        manager: Arc<DirectEventManager>,
        target: OnceLock<Arc<dyn EventListener>>,
    }

    impl EventListener for Remover {
        fn on_event(&self, _event: &Event) {
            if let Some(target) = self.target.get() {
                self.manager.unregister(target);
            }
        }
    }

    fn event() -> Event {
        Event::Disconnect
    }

    #[test]
    fn delivers_in_registration_order() {
        let manager = DirectEventManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for label in ["a", "b", "c"] {
            manager.register(Arc::new(Recorder {
                label,
                log: log.clone(),
            }));
        }

        manager.dispatch(&event());
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn faulty_listener_does_not_stop_delivery() {
        let manager = DirectEventManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        manager.register(Arc::new(Recorder {
            label: "before",
            log: log.clone(),
        }));
        manager.register(Arc::new(Panicker));
        manager.register(Arc::new(Recorder {
            label: "after",
            log: log.clone(),
        }));

        manager.dispatch(&event());
        assert_eq!(*log.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn unregistered_listener_receives_no_later_events() {
        let manager = DirectEventManager::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener: Arc<dyn EventListener> = Arc::new(Recorder {
            label: "x",
            log: log.clone(),
        });
        manager.register(listener.clone());

        manager.dispatch(&event());
        manager.unregister(&listener);
        manager.dispatch(&event());

        assert_eq!(*log.lock().unwrap(), vec!["x"]);
    }

    #[test]
    fn removal_mid_dispatch_still_delivers_the_in_flight_event() {
        let manager = Arc::new(DirectEventManager::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let remover = Arc::new(Remover {
            manager: manager.clone(),
            target: OnceLock::new(),
        });
        manager.register(remover.clone());

        let victim: Arc<dyn EventListener> = Arc::new(Recorder {
            label: "victim",
            log: log.clone(),
        });
        manager.register(victim.clone());
        remover.target.set(victim).ok();

        // The remover runs first and unregisters the victim, but the victim
        // was in the snapshot for this dispatch and still receives it.
        manager.dispatch(&event());
        assert_eq!(*log.lock().unwrap(), vec!["victim"]);

        // It is gone for the next event.
        manager.dispatch(&event());
        assert_eq!(*log.lock().unwrap(), vec!["victim"]);
    }

    #[test]
    fn dispatch_kind_is_visible_to_listeners() {
        struct KindAsserter;
        impl EventListener for KindAsserter {
            fn on_event(&self, event: &Event) {
                assert_eq!(event.kind(), EventKind::Disconnect);
            }
        }

        let manager = DirectEventManager::new();
        manager.register(Arc::new(KindAsserter));
        manager.dispatch(&event());
    }
}
