//! The live session: connection pump, dispatch, lifecycle.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use accord_core::event::MessageRef;
use accord_core::traits::{ConnectOptions, ConnectionHandle, GatewayTransport};
use accord_core::{
    ApiUrl, Event, EventDecoder, EventListener, EventManager, Result, SessionState, SessionToken,
};

use crate::account::AccountManager;
use crate::intercept::InterceptorChain;
use crate::ready::ReadySignal;
use crate::rest::ApiClient;

pub(crate) struct SessionInner {
    token: RwLock<SessionToken>,
    api: ApiClient,
    state: SessionState,
    manager: Arc<dyn EventManager>,
    interceptors: InterceptorChain,
    decoder: Arc<dyn EventDecoder>,
    ready: ReadySignal,
    closed: AtomicBool,
    connection: Mutex<Option<Box<dyn ConnectionHandle>>>,
    split_bulk_deletes: bool,
}

/// A connected session.
///
/// Cheap to clone; all clones share the same underlying connection and
/// listener registry. Sessions are produced by
/// [`SessionBuilder`](crate::SessionBuilder).
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        token: SessionToken,
        api: ApiClient,
        manager: Arc<dyn EventManager>,
        interceptors: InterceptorChain,
        decoder: Arc<dyn EventDecoder>,
        split_bulk_deletes: bool,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(token),
                api,
                state: SessionState::new(),
                manager,
                interceptors,
                decoder,
                ready: ReadySignal::new(),
                closed: AtomicBool::new(false),
                connection: Mutex::new(None),
                split_bulk_deletes,
            }),
        }
    }

    /// Open the gateway connection and start the frame-processing task.
    pub(crate) async fn connect(
        &self,
        transport: &dyn GatewayTransport,
        options: &ConnectOptions,
    ) -> Result<()> {
        let token = self.token();
        let connection = transport.connect(&token, options).await?;
        let (mut frames, handle) = connection.into_parts();

        *lock(&self.inner.connection) = Some(handle);

        let inner = self.inner.clone();
        tokio::spawn(async move {
            while let Some(frame) = frames.next().await {
                let frame = match frame {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(error = %e, "gateway stream error, skipping frame");
                        continue;
                    }
                };
                if inner.interceptors.intercept(&frame, &inner.state) {
                    continue;
                }
                match inner.decoder.decode(&frame) {
                    Ok(event) => inner.process_event(event),
                    Err(e) => {
                        warn!(op = frame.op, t = ?frame.event_type, error = %e, "skipping undecodable frame");
                    }
                }
            }
            // Stream exhausted. If nobody asked us to close, the connection
            // dropped out from under us.
            if !inner.closed.load(Ordering::SeqCst) {
                info!("gateway connection ended unexpectedly");
                inner.manager.dispatch(&Event::Disconnect);
            }
        });

        Ok(())
    }

    /// Register a listener. Takes effect for the next dispatched event.
    pub fn add_listener(&self, listener: Arc<dyn EventListener>) {
        self.inner.manager.register(listener);
    }

    /// Remove a listener registered with the same `Arc`.
    pub fn remove_listener(&self, listener: &Arc<dyn EventListener>) {
        self.inner.manager.unregister(listener);
    }

    /// The current session token.
    pub fn token(&self) -> SessionToken {
        lock_read(&self.inner.token).clone()
    }

    pub(crate) fn replace_token(&self, token: SessionToken) {
        *lock_write(&self.inner.token) = token;
    }

    /// The logged-in account's profile, once known.
    pub fn self_profile(&self) -> Option<accord_core::SelfProfile> {
        self.inner.state.self_profile()
    }

    pub(crate) fn state(&self) -> &SessionState {
        &self.inner.state
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The base URL this session talks to.
    pub fn api_url(&self) -> &ApiUrl {
        self.inner.api.api()
    }

    /// Whether the ready event has been dispatched.
    pub fn is_ready(&self) -> bool {
        self.inner.ready.is_signalled()
    }

    /// Wait until the ready event has been dispatched. Returns immediately
    /// on an already-ready session.
    pub async fn wait_until_ready(&self) {
        self.inner.ready.wait().await;
    }

    /// Account-management operations for this session.
    pub fn account_manager(&self) -> AccountManager {
        AccountManager::new(self.clone())
    }

    /// Close the gateway connection. Safe to call more than once; only the
    /// first call has any effect.
    pub fn close(&self) {
        self.inner.close();
    }

    /// Close this session when the process receives Ctrl-C.
    ///
    /// The hook holds only a weak reference, so it never keeps a dropped
    /// session alive.
    pub(crate) fn install_shutdown_hook(&self) {
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                if let Some(inner) = weak.upgrade() {
                    info!("shutdown signal received, closing session");
                    inner.close();
                }
            }
        });
    }
}

impl SessionInner {
    fn process_event(&self, event: Event) {
        match event {
            Event::MessageBulkDelete(bulk) if self.split_bulk_deletes => {
                debug!(count = bulk.ids.len(), "splitting bulk delete");
                for id in bulk.ids {
                    self.manager.dispatch(&Event::MessageDelete(MessageRef {
                        id,
                        channel_id: bulk.channel_id.clone(),
                    }));
                }
            }
            event => {
                let is_ready = matches!(event, Event::Ready(_));
                self.manager.dispatch(&event);
                // Waiters are released only after listeners have seen the
                // ready event.
                if is_ready {
                    self.ready.signal();
                }
            }
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = lock(&self.connection).take() {
            handle.close();
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api", self.inner.api.api())
            .field("ready", &self.inner.ready.is_signalled())
            .field("closed", &self.inner.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn lock_read<T>(rwlock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    rwlock.read().unwrap_or_else(|e| e.into_inner())
}

fn lock_write<T>(rwlock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    rwlock.write().unwrap_or_else(|e| e.into_inner())
}
